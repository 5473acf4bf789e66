fn main() -> anyhow::Result<()> {
    formtrack_lib::run()
}
