use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = home_stow::cli::parse();
    app::run(args)
}
