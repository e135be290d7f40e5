// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

pub mod cache;
pub mod linkage;

pub use cache::{DirectoryStore, PointSetCache, PointSetStore};
pub use linkage::{LinkageBuilder, LinkedPointSet, PointLink};

use std::fmt;

pub const GRID_EXTENSION: &str = ".grid";
pub const FREEFORM_EXTENSION: &str = ".pointset";

#[derive(Debug)]
pub enum PointSetError {
    NotFound(String),
    UnrecognizedKey(String),
    Corrupt(String),
    Io(std::io::Error),
}

impl fmt::Display for PointSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSetError::NotFound(key) => write!(f, "point set `{}` not found in storage", key),
            PointSetError::UnrecognizedKey(key) => {
                write!(f, "unrecognized file extension in point set key `{}`", key)
            }
            PointSetError::Corrupt(detail) => write!(f, "corrupt point set data : {}", detail),
            PointSetError::Io(err) => write!(f, "io error while loading point set : {}", err),
        }
    }
}

impl std::error::Error for PointSetError {}

impl From<std::io::Error> for PointSetError {
    fn from(err: std::io::Error) -> Self {
        PointSetError::Io(err)
    }
}

/// Hand-written because io errors are rebuilt from their kind and message.
impl Clone for PointSetError {
    fn clone(&self) -> Self {
        match self {
            PointSetError::NotFound(key) => PointSetError::NotFound(key.clone()),
            PointSetError::UnrecognizedKey(key) => PointSetError::UnrecognizedKey(key.clone()),
            PointSetError::Corrupt(detail) => PointSetError::Corrupt(detail.clone()),
            PointSetError::Io(err) => {
                PointSetError::Io(std::io::Error::new(err.kind(), err.to_string()))
            }
        }
    }
}

/// A set of destination points, either a fixed grid or free-form
/// coordinates, with an opportunity count per point.
pub enum PointSet {
    Grid(GridPointSet),
    FreeForm(FreeFormPointSet),
}

impl PointSet {
    pub fn len(&self) -> usize {
        match self {
            PointSet::Grid(grid) => grid.width * grid.height,
            PointSet::FreeForm(points) => points.points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn opportunity_count(&self, cell: usize) -> f64 {
        match self {
            PointSet::Grid(grid) => grid.counts[cell],
            PointSet::FreeForm(points) => points.points[cell].count,
        }
    }
}

/// A fixed rectangular grid of destination cells, row-major.
pub struct GridPointSet {
    pub width: usize,
    pub height: usize,
    pub counts: Vec<f64>,
}

impl GridPointSet {
    /// Layout : u32 LE width, u32 LE height, then width*height f64 LE
    /// opportunity counts.
    pub fn read(bytes: &[u8]) -> Result<Self, PointSetError> {
        let mut reader = ByteReader::new(bytes);
        let width = reader.read_u32()? as usize;
        let height = reader.read_u32()? as usize;
        let nb_of_cells = width * height;
        // the reservation trusts the payload, not the header
        let mut counts = Vec::with_capacity(nb_of_cells.min(reader.remaining() / 8));
        for _ in 0..nb_of_cells {
            counts.push(reader.read_f64()?);
        }
        Ok(Self {
            width,
            height,
            counts,
        })
    }
}

pub struct FreeFormPoint {
    pub lat: f64,
    pub lon: f64,
    pub count: f64,
}

pub struct FreeFormPointSet {
    pub points: Vec<FreeFormPoint>,
}

impl FreeFormPointSet {
    /// Layout : u32 LE count, then per point f64 LE lat, lon, count.
    pub fn read(bytes: &[u8]) -> Result<Self, PointSetError> {
        let mut reader = ByteReader::new(bytes);
        let nb_of_points = reader.read_u32()? as usize;
        let mut points = Vec::with_capacity(nb_of_points.min(reader.remaining() / 24));
        for _ in 0..nb_of_points {
            points.push(FreeFormPoint {
                lat: reader.read_f64()?,
                lon: reader.read_f64()?,
                count: reader.read_f64()?,
            });
        }
        Ok(Self { points })
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], PointSetError> {
        let end = self.offset + len;
        if end > self.bytes.len() {
            return Err(PointSetError::Corrupt("unexpected end of data".to_string()));
        }
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, PointSetError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_f64(&mut self) -> Result<f64, PointSetError> {
        let bytes = self.take(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}
