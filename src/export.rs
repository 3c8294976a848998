use std::io::Write;

use csv::{Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::layout::Point;
use crate::network::Network;

/// One line of the output: both end points of an edge and their clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub source: Point,
    pub target: Point,
    pub source_cluster: usize,
    pub target_cluster: usize,
}

impl EdgeRow {
    fn fields(&self) -> [String; 6] {
        [
            format!("{:.6}", self.source.x),
            format!("{:.6}", self.source.y),
            format!("{:.6}", self.target.x),
            format!("{:.6}", self.target.y),
            self.source_cluster.to_string(),
            self.target_cluster.to_string(),
        ]
    }
}

/// Builds one row per edge of `network`, in edge order.
pub fn edge_rows(network: &Network, points: &[Point], clusters: &[usize]) -> Result<Vec<EdgeRow>> {
    check_length("positions", network.node_count(), points.len())?;
    check_length("cluster labels", network.node_count(), clusters.len())?;
    Ok(network
        .endpoints()
        .map(|(s, t)| EdgeRow {
            source: points[s],
            target: points[t],
            source_cluster: clusters[s],
            target_cluster: clusters[t],
        })
        .collect())
}

fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Removes all characters that are not 7-bit ASCII.
fn ascii_only(field: &str) -> String {
    field.chars().filter(char::is_ascii).collect()
}

/// Writes the rows as headerless CSV with CRLF line endings.
pub fn write_rows<W: Write>(writer: W, rows: &[EdgeRow]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);
    for row in rows {
        writer.write_record(row.fields().iter().map(|f| ascii_only(f)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one CSV row per edge of `network`. Returns the number of rows.
pub fn write_edges<W: Write>(
    writer: W,
    network: &Network,
    points: &[Point],
    clusters: &[usize],
) -> Result<usize> {
    let rows = edge_rows(network, points, clusters)?;
    write_rows(writer, &rows)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::network_from_edges;

    #[test]
    fn test_write_edges() {
        let network = network_from_edges(3, &[(0, 1), (2, 1)]);
        let points = [
            Point::new(0.0, 1.0),
            Point::new(0.5, 0.25),
            Point::new(1.0, 1.0 / 3.0),
        ];
        let mut buffer = Vec::new();
        let rows = write_edges(&mut buffer, &network, &points, &[0, 1, 1]).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "0.000000,1.000000,0.500000,0.250000,0,1\r\n\
             0.500000,0.250000,1.000000,0.333333,1,1\r\n"
        );
    }

    #[test]
    fn test_no_edges_no_output() {
        let network = network_from_edges(1, &[]);
        let mut buffer = Vec::new();
        let rows = write_edges(&mut buffer, &network, &[Point::default()], &[0]).unwrap();
        assert_eq!(rows, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let network = network_from_edges(2, &[(0, 1)]);
        let result = write_edges(Vec::new(), &network, &[Point::default()], &[0, 0]);
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_ascii_only() {
        assert_eq!(ascii_only("0.5µ€1"), "0.51");
        assert_eq!(ascii_only("12"), "12");
    }
}
