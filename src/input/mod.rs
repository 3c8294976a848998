//! Graph loaders.

pub mod edge_list;
pub mod gml;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::error::Result;
use crate::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Edge list for files ending in `.csv`, GML for everything else.
    #[default]
    Auto,
    Gml,
    EdgeList,
}

impl InputFormat {
    fn resolve(self, path: &Path) -> InputFormat {
        match self {
            InputFormat::Auto => {
                let is_csv = path
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
                if is_csv {
                    InputFormat::EdgeList
                } else {
                    InputFormat::Gml
                }
            }
            format => format,
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(InputFormat::Auto),
            "gml" => Ok(InputFormat::Gml),
            "csv" => Ok(InputFormat::EdgeList),
            _ => Err(format!("unknown input format '{}'", s)),
        }
    }
}

pub fn load(path: &Path, format: InputFormat) -> Result<Network> {
    let format = format.resolve(path);
    info!("loading {:?} as {:?}", path, format);
    match format {
        InputFormat::EdgeList => edge_list::read(BufReader::new(File::open(path)?)),
        _ => gml::parse(&std::fs::read_to_string(path)?),
    }
}
