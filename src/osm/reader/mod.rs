// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use model_builder::ModelBuilder;

use crate::osm::RouteModel;

mod model;
mod model_builder;
mod xml;

const GZIP_MAGIC: &[u8] = b"\x1f\x8b";
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Format of the input OSM file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    #[default]
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file from its first few bytes.
    /// Anything which is neither gzip nor bzip2 is assumed to be plain XML.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(GZIP_MAGIC) {
            Self::XmlGz
        } else if header.starts_with(BZIP2_MAGIC) {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a [RouteModel].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Format of the input data.
    pub file_format: FileFormat,
}

/// Error which can occur when loading a [RouteModel].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("map contains no road nodes")]
    NoNodes,

    #[error("map contains no routable roads")]
    NoRoads,

    #[error("map bounds are empty or invalid")]
    InvalidBounds,
}

/// Internal trait for objects which can stream [osm features](model::Feature)
/// from an underlying source.
trait FeatureReader {
    type Error;
    fn next_feature(&mut self) -> Result<Option<model::Feature>, Self::Error>;
}

impl<E, I: Iterator<Item = Result<model::Feature, E>>> FeatureReader for I {
    type Error = E;

    fn next_feature(&mut self) -> Result<Option<model::Feature>, E> {
        self.next().transpose()
    }
}

impl RouteModel {
    /// Parse OSM features from a reader into a [RouteModel] as per the provided [Options].
    ///
    /// The provided stream will be automatically wrapped in a buffered reader when needed.
    pub fn from_io<R: io::Read>(options: &Options, reader: R) -> Result<Self, Error> {
        let mut b = io::BufReader::new(reader);

        let format = match options.file_format {
            FileFormat::Unknown => {
                let detected = FileFormat::detect(b.fill_buf()?);
                log::debug!("detected input format: {:?}", detected);
                detected
            }
            format => format,
        };

        match format {
            FileFormat::Unknown | FileFormat::Xml => {
                ModelBuilder::default().add_features(xml::Reader::from_io(b))
            }

            FileFormat::XmlGz => {
                let d = flate2::read::MultiGzDecoder::new(b);
                let r = xml::Reader::from_io(io::BufReader::new(d));
                ModelBuilder::default().add_features(r)
            }

            FileFormat::XmlBz2 => {
                let d = bzip2::read::MultiBzDecoder::new(b);
                let r = xml::Reader::from_io(io::BufReader::new(d));
                ModelBuilder::default().add_features(r)
            }
        }
    }

    /// Parse OSM features from a file at the provided path into a [RouteModel]
    /// as per the provided [Options].
    pub fn from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<Self, Error> {
        let f = File::open(path)?;
        Self::from_io(options, f)
    }

    /// Parse OSM features from a static buffer into a [RouteModel] as per the provided [Options].
    pub fn from_buffer(options: &Options, data: &[u8]) -> Result<Self, Error> {
        let format = match options.file_format {
            FileFormat::Unknown => FileFormat::detect(data),
            format => format,
        };

        if format == FileFormat::Xml {
            // Fast path is available for in-memory XML data
            ModelBuilder::default().add_features(xml::Reader::from_buffer(data))
        } else {
            // Wrap the buffer in a cursor and use the IO path
            let options = Options {
                file_format: format,
            };
            Self::from_io(&options, io::Cursor::new(data))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::osm::test_fixtures::SIMPLE_XML;

    fn gzip_compress(data: &[u8]) -> Vec<u8> {
        let mut e = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        e.write_all(data).unwrap();
        e.finish().unwrap()
    }

    fn bzip2_compress(data: &[u8]) -> Vec<u8> {
        let mut e = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        e.write_all(data).unwrap();
        e.finish().unwrap()
    }

    #[test]
    fn detect_format() {
        assert_eq!(FileFormat::detect(SIMPLE_XML), FileFormat::Xml);
        assert_eq!(FileFormat::detect(&gzip_compress(SIMPLE_XML)), FileFormat::XmlGz);
        assert_eq!(FileFormat::detect(&bzip2_compress(SIMPLE_XML)), FileFormat::XmlBz2);
        assert_eq!(FileFormat::detect(b""), FileFormat::Xml);
    }

    #[test]
    fn load_all_formats() {
        let expected = RouteModel::from_buffer(&Options::default(), SIMPLE_XML).unwrap();

        let inputs = [
            (FileFormat::Xml, SIMPLE_XML.to_vec()),
            (FileFormat::XmlGz, gzip_compress(SIMPLE_XML)),
            (FileFormat::XmlBz2, bzip2_compress(SIMPLE_XML)),
        ];

        for (format, data) in inputs {
            for file_format in [format, FileFormat::Unknown] {
                let options = Options { file_format };

                let from_buffer = RouteModel::from_buffer(&options, &data).unwrap();
                assert_eq!(from_buffer.nodes(), expected.nodes());

                let from_io = RouteModel::from_io(&options, io::Cursor::new(&data)).unwrap();
                assert_eq!(from_io.nodes(), expected.nodes());
            }
        }
    }

    #[test]
    fn wrong_forced_format() {
        let options = Options {
            file_format: FileFormat::XmlGz,
        };
        assert!(matches!(
            RouteModel::from_buffer(&options, SIMPLE_XML),
            Err(Error::Xml(quick_xml::Error::Io(_)))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            RouteModel::from_file(&Options::default(), "/nonexistent/map.osm"),
            Err(Error::Io(_))
        ));
    }
}
