//! Parsed files and variable data access.

use schema::{Dimension, Schema, VariableDef};
use xdr::XdrReader;

use crate::array::ArrayData;
use crate::error::{DecodeError, DecodeResult, SlabError};
use crate::header::{decode_header, Header};
use crate::layout::{record_size, slabs, VarLayout};
use crate::{Format, Limits};

/// A parsed file borrowing its bytes.
///
/// The header is decoded eagerly; variable data is decoded on request.
#[derive(Debug, Clone)]
pub struct ClassicFile<'a> {
    bytes: &'a [u8],
    header: Header,
    slabs: Vec<VarLayout>,
    numrecs: usize,
    recsize: u64,
}

impl<'a> ClassicFile<'a> {
    /// Parses the header of `bytes`.
    ///
    /// A streaming record count is resolved from the file length.
    pub fn parse(bytes: &'a [u8], limits: &Limits) -> DecodeResult<Self> {
        let header = decode_header(bytes, limits)?;
        let mut slabs = slabs(&header.schema);
        for (slab, placed) in slabs.iter_mut().zip(&header.variables) {
            slab.begin = placed.begin;
        }
        let recsize = record_size(&slabs);

        let numrecs = match header.numrecs {
            Some(numrecs) => numrecs,
            None => {
                let record_begin = slabs
                    .iter()
                    .filter(|slab| slab.is_record)
                    .map(|slab| slab.begin)
                    .min();
                match record_begin {
                    Some(begin) if recsize > 0 => {
                        let available = (bytes.len() as u64).saturating_sub(begin);
                        usize::try_from(available / recsize).unwrap_or(usize::MAX)
                    }
                    _ => 0,
                }
            }
        };

        Ok(Self {
            bytes,
            header,
            slabs,
            numrecs,
            recsize,
        })
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.header.format
    }

    /// Record count, resolved for streaming files.
    #[must_use]
    pub const fn numrecs(&self) -> usize {
        self.numrecs
    }

    /// Returns `true` if the header carried the streaming marker.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.header.numrecs.is_none()
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.header.schema
    }

    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.header.schema.dimensions
    }

    #[must_use]
    pub fn variables(&self) -> &[VariableDef] {
        &self.header.schema.variables
    }

    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Distance between consecutive records in bytes.
    #[must_use]
    pub const fn recsize(&self) -> u64 {
        self.recsize
    }

    /// Placement of a variable's data.
    #[must_use]
    pub fn layout(&self, name: &str) -> Option<&VarLayout> {
        self.find(name).ok().map(|(index, _)| &self.slabs[index])
    }

    /// Full shape of a variable with the unlimited axis materialised.
    pub fn shape(&self, name: &str) -> DecodeResult<Vec<usize>> {
        let (_, var) = self.find(name)?;
        Ok(self.shape_of(var))
    }

    /// Reads all values of a variable.
    pub fn read_variable(&self, name: &str) -> DecodeResult<ArrayData> {
        let shape = self.shape(name)?;
        let start = vec![0; shape.len()];
        self.read_slab(name, &start, &shape)
    }

    /// Reads the hyperslab `start .. start + count` of a variable.
    pub fn read_slab(&self, name: &str, start: &[usize], count: &[usize]) -> DecodeResult<ArrayData> {
        let (index, var) = self.find(name)?;
        let shape = self.shape_of(var);
        check_slab(var, &shape, start, count)?;

        let slab = &self.slabs[index];
        let available = self.bytes.len() as u64;
        let Some(total) = count.iter().try_fold(1usize, |acc, &c| acc.checked_mul(c)) else {
            return Err(DecodeError::DataOutOfBounds {
                variable: var.name.clone(),
                needed: u64::MAX,
                available,
            });
        };
        if total == 0 {
            return Ok(ArrayData::with_capacity(var.nc_type, 0));
        }

        let last: Vec<usize> = start.iter().zip(count).map(|(s, c)| s + c - 1).collect();
        let needed = self
            .element_offset(slab, &shape, &last)
            .saturating_add(var.nc_type.size() as u64);
        if needed > available {
            return Err(DecodeError::DataOutOfBounds {
                variable: var.name.clone(),
                needed,
                available,
            });
        }

        let mut reader = XdrReader::new(self.bytes);
        let mut out = ArrayData::with_capacity(var.nc_type, total.min(self.bytes.len()));
        let mut counter = vec![0usize; count.len()];
        let mut position: Vec<usize> = start.to_vec();
        for _ in 0..total {
            for (axis, pos) in position.iter_mut().enumerate() {
                *pos = start[axis] + counter[axis];
            }
            // needed <= available, so every offset fits usize
            let offset = self.element_offset(slab, &shape, &position) as usize;
            reader.seek(offset)?;
            out.push_from(&mut reader)?;

            for axis in (0..counter.len()).rev() {
                counter[axis] += 1;
                if counter[axis] < count[axis] {
                    break;
                }
                counter[axis] = 0;
            }
        }
        Ok(out)
    }

    fn find(&self, name: &str) -> DecodeResult<(usize, &VariableDef)> {
        self.header
            .schema
            .variables
            .iter()
            .enumerate()
            .find(|(_, var)| var.name == name)
            .ok_or_else(|| DecodeError::UnknownVariable {
                name: name.to_string(),
            })
    }

    fn shape_of(&self, var: &VariableDef) -> Vec<usize> {
        self.header
            .schema
            .shape(var, self.numrecs)
            .unwrap_or_default()
    }

    fn element_offset(&self, slab: &VarLayout, shape: &[usize], index: &[usize]) -> u64 {
        let (record, inner_index, inner_shape) = if slab.is_record {
            (index[0] as u64, &index[1..], &shape[1..])
        } else {
            (0, index, shape)
        };
        let linear = inner_index
            .iter()
            .zip(inner_shape)
            .fold(0u64, |acc, (&i, &len)| {
                acc.saturating_mul(len as u64).saturating_add(i as u64)
            });
        slab.begin
            .saturating_add(record.saturating_mul(self.recsize))
            .saturating_add(linear.saturating_mul(slab.nc_type.size() as u64))
    }
}

fn check_slab(
    var: &VariableDef,
    shape: &[usize],
    start: &[usize],
    count: &[usize],
) -> DecodeResult<()> {
    let invalid = |reason| DecodeError::InvalidSlab {
        variable: var.name.clone(),
        reason,
    };
    for actual in [start.len(), count.len()] {
        if actual != shape.len() {
            return Err(invalid(SlabError::RankMismatch {
                expected: shape.len(),
                actual,
            }));
        }
    }
    for (axis, ((&s, &c), &extent)) in start.iter().zip(count).zip(shape).enumerate() {
        if s.checked_add(c).map_or(true, |end| end > extent) {
            return Err(invalid(SlabError::OutOfRange {
                axis,
                start: s,
                count: c,
                extent,
            }));
        }
    }
    Ok(())
}
