mod kernel;
mod memory;
