//! Resolve the manifest named on the command line and print its libraries.

use miette::Result;
use pomgraph_resolver::PomParser;
use pomgraph_util::progress;

use crate::cli::Cli;
use crate::output;

pub fn exec(args: &Cli) -> Result<()> {
    let config = args.resolver_config()?;
    tracing::debug!("Resolver configuration: {config:?}");
    let parser = PomParser::new(config)?;

    let pb = progress::spinner(&format!("Resolving {}", args.pom.display()));
    let result = parser.parse_file(&args.pom);
    pb.finish_and_clear();

    let mut libraries = match result {
        Ok(libraries) => libraries,
        Err(e) => {
            progress::status_error("Failed", &args.pom.display().to_string());
            return Err(e.into());
        }
    };
    if args.sort {
        libraries.sort();
    }

    output::print(&libraries, args.format)?;
    progress::status(
        "Resolved",
        &format!("{} libraries from {}", libraries.len(), args.pom.display()),
    );
    Ok(())
}
