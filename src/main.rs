fn main() -> anyhow::Result<()> {
    filtration_canvas::run()
}
