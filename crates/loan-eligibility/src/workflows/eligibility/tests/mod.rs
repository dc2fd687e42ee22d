mod common;
mod encoding;
mod service;
