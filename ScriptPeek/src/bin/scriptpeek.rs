fn main() -> anyhow::Result<()> {
    scriptpeek::cli::run_cli()
}
