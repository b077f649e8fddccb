pub mod collector;
pub mod qwen;
