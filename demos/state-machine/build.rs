fn main() -> Result<(), polystruct_build::BuildError> {
    polystruct_build::init_logging();
    polystruct_build::Builder::new().source_dir("src").generate()?;
    Ok(())
}
