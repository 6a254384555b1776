fn main() -> anyhow::Result<()> {
    context_window_viewer::cli::run()
}
