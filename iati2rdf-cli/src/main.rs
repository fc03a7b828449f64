use std::{
    io::{Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use itertools::Itertools;
use oxrdf::{Graph, TripleRef};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// IATI activity XML file; read from stdin when omitted.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Namespace for minted IRIs.
    #[arg(long, default_value = iati2rdf::config::IATI_NAMESPACE)]
    namespace: String,

    #[arg(long, value_enum, default_value_t = Format::Turtle)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Turtle,
    NTriples,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = iati2rdf::Config::new(args.namespace)?;

    let content = match &args.input {
        Some(path) => {
            info!(path = %path.display(), "reading input");
            std::fs::read_to_string(path)?
        }
        None => {
            let mut content = String::new();
            std::io::stdin().lock().read_to_string(&mut content)?;
            content
        }
    };

    let mut output_graph = Graph::new();
    let mut processor_graph = Graph::new();
    if let Err(err) =
        iati2rdf::convert_str(&content, &config, &mut output_graph, &mut processor_graph)
    {
        eprintln!("Error: {err}");
        return Ok(ExitCode::FAILURE);
    }
    drop(content);

    {
        // output any warnings/errors
        let serializer = oxttl::TurtleSerializer::new();
        let mut locked_err = std::io::stderr().lock();
        let mut writer = serializer.for_writer(&mut locked_err);
        for triple in processor_graph.iter() {
            writer.serialize_triple(triple)?;
        }

        writer.finish()?;
        drop(processor_graph);
    }

    debug!(triples = output_graph.len(), "writing output");

    let mut locked_out = std::io::stdout().lock();
    match args.format {
        Format::Turtle => {
            // use serializer with all known prefixes
            let serializer = iati2rdf::prefixes(&config).into_iter().try_fold(
                oxttl::TurtleSerializer::new(),
                |serializer, (prefix, iri)| serializer.with_prefix(prefix, iri),
            )?;

            let mut writer = serializer.for_writer(&mut locked_out);
            for triple in sorted(&output_graph) {
                writer.serialize_triple(triple)?;
            }

            writer.finish()?;
        }
        Format::NTriples => {
            let mut writer = oxttl::NTriplesSerializer::new().for_writer(&mut locked_out);
            for triple in sorted(&output_graph) {
                writer.serialize_triple(triple)?;
            }
        }
    }
    locked_out.flush()?;

    Ok(ExitCode::SUCCESS)
}

/// Triples grouped by subject, with `rdf:type` first, so each node is
/// written as one block.
fn sorted(graph: &Graph) -> impl Iterator<Item = TripleRef<'_>> {
    graph.iter().sorted_by_cached_key(|t| {
        (
            t.subject.to_string(),
            if t.predicate == oxrdf::vocab::rdf::TYPE {
                // make "a" come first
                None
            } else {
                Some(t.predicate.to_string())
            },
            t.object.to_string(),
        )
    })
}
