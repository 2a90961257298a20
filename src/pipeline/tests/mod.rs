mod board;
mod common;
mod session;
