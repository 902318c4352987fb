use line_annotating_writer::LineAnnotatingWriter;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prefix = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "basic-example: ".to_string());

    let stdout = std::io::stdout();
    let mut handler = stdout.lock();
    let mut writer = LineAnnotatingWriter::new(&mut handler)
        .with_prefix(prefix)
        .with_suffix(" <");

    writeln!(&mut writer, "I am annotated")?;
    write!(&mut writer, "so am I, even though ")?;
    write!(&mut writer, "I arrived in pieces\nand")?;
    write!(&mut writer, " my last line has no newline")?;

    writer.close()?;
    writeln!(handler)?;

    Ok(())
}
