/// Writes an error followed by every cause in its `source()` chain.
///
/// Used as the `Debug` implementation of the crate's error types so that
/// `anyhow` prints the whole chain when `main` bails out.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
