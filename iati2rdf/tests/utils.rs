use iati2rdf::Config;
use itertools::Itertools;
use oxrdf::Graph;

/// Canonical form of a graph for comparisons: one N-Triples statement per
/// line, sorted.
pub fn serialize_graph(graph: &Graph) -> String {
    graph
        .iter()
        .map(|t| format!("{t} .\n"))
        .sorted()
        .collect()
}

/// Converts with the default configuration, returning the output and the
/// processor graph.
#[allow(unused)]
pub fn convert(xml: &str) -> (Graph, Graph) {
    convert_with(xml, &Config::default())
}

#[allow(unused)]
pub fn convert_with(xml: &str, config: &Config) -> (Graph, Graph) {
    let mut output_graph = Graph::new();
    let mut processor_graph = Graph::new();
    iati2rdf::convert_str(xml, config, &mut output_graph, &mut processor_graph).unwrap();
    (output_graph, processor_graph)
}

#[allow(unused)]
pub fn parse_ttl(ttl: &str) -> Graph {
    let mut graph = Graph::new();
    let ttl = ttl.replace("\r\n", "\n");
    for triple in oxttl::TurtleParser::new().for_slice(ttl.as_bytes()) {
        graph.insert(&triple.unwrap());
    }
    graph
}

#[allow(unused)]
pub fn assert_graph(xml: &str, ttl: &str) {
    let (output_graph, _) = convert(xml);
    let ttl_graph = parse_ttl(ttl);

    pretty_assertions::assert_eq!(serialize_graph(&output_graph), serialize_graph(&ttl_graph));
}

/// True when some statement of `graph` serializes to `line` (without the
/// trailing ` .`).
#[allow(unused)]
pub fn has_line(graph: &Graph, line: &str) -> bool {
    graph.iter().any(|t| t.to_string() == line)
}
