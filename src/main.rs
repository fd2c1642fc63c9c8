//! Personal desktop search engine — CLI front-end over the `deskgrep` engine.
//!
//! Binary crate entry point. All CLI logic is in the `cli` module.

mod cli;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() {
    cli::run();
}
