use std::io::Write;

use miette::Result;
use pomgraph_resolver::Library;

use crate::cli::Format;

/// Render libraries in the requested format, newline terminated.
pub fn render(libraries: &[Library], format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(libraries
            .iter()
            .map(|lib| format!("{} {}\n", lib.name, lib.version))
            .collect()),
        Format::Json => {
            let json = serde_json::to_string_pretty(libraries)
                .map_err(|e| miette::miette!("failed to encode libraries: {e}"))?;
            Ok(json + "\n")
        }
    }
}

pub fn print(libraries: &[Library], format: Format) -> Result<()> {
    let rendered = render(libraries, format)?;
    std::io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .map_err(|e| miette::miette!("failed to write output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Library> {
        vec![
            Library::new("com.example:happy", "1.0.0"),
            Library::new("org.example:example-api", "1.7.30"),
        ]
    }

    #[test]
    fn text_is_one_line_per_library() {
        assert_eq!(
            render(&sample(), Format::Text).unwrap(),
            "com.example:happy 1.0.0\norg.example:example-api 1.7.30\n"
        );
    }

    #[test]
    fn json_is_array_of_objects() {
        let out = render(&sample(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[1]["name"], "org.example:example-api");
        assert_eq!(value[1]["version"], "1.7.30");
    }

    #[test]
    fn empty_text_output() {
        assert_eq!(render(&[], Format::Text).unwrap(), "");
    }
}
