mod classify;
mod common;
