fn main() -> anyhow::Result<()> {
    hackstats_cli::run()
}
