//! Canonical byte encoding.
//!
//! * polynomial: N coefficients, 8 bytes little-endian each (`i64` for
//!   [`Polynomial`], `u64` in [0, q) for [`ModPolynomial`])
//! * vector: `u16` LE length, then the entries
//! * matrix: `u16` LE rows, `u16` LE cols, then the entries row-major

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use super::{
    element::RingElement, matrix::Matrix, poly::Polynomial, poly_q::ModPolynomial, ring::Ring,
    vector::Vector,
};
use crate::error::{AlgebraError, Result};

pub trait Encode {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()>;

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

pub trait Decode: Sized {
    /// Information not carried on the wire: the degree, or the ring.
    type Context;

    fn read_from<R: Read>(reader: &mut R, ctx: &Self::Context) -> Result<Self>;

    /// Decodes exactly one value; trailing bytes are an error.
    fn from_bytes(data: &[u8], ctx: &Self::Context) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let value = Self::read_from(&mut cursor, ctx)?;
        if cursor.position() as usize != data.len() {
            return Err(AlgebraError::Deserialization(format!(
                "{} trailing bytes",
                data.len() - cursor.position() as usize
            )));
        }
        Ok(value)
    }
}

/// Reads `count` elements one at a time, so a header that promises more
/// than the input holds fails on the first missing element.
fn read_entries<T, R>(reader: &mut R, ctx: &T::Context, count: usize) -> Result<Vec<T>>
where
    T: Decode,
    R: Read,
{
    let mut entries = Vec::new();
    for _ in 0..count {
        entries.push(T::read_from(reader, ctx)?);
    }
    Ok(entries)
}

fn dimension(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| {
        AlgebraError::InvalidArgument(format!("dimension {} does not fit the u16 header", len))
    })
}

impl Encode for Polynomial {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for &c in self.coefficients() {
            writer.write_i64::<LittleEndian>(c)?;
        }
        Ok(())
    }
}

impl Decode for Polynomial {
    type Context = usize;

    fn read_from<R: Read>(reader: &mut R, degree: &usize) -> Result<Self> {
        let mut coefficients = vec![0i64; *degree];
        reader.read_i64_into::<LittleEndian>(&mut coefficients)?;
        Ok(Polynomial::new(coefficients))
    }
}

impl Encode for ModPolynomial {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for &c in self.coefficients() {
            writer.write_u64::<LittleEndian>(c)?;
        }
        Ok(())
    }
}

impl Decode for ModPolynomial {
    type Context = Ring;

    fn read_from<R: Read>(reader: &mut R, ring: &Ring) -> Result<Self> {
        let q = ring.modulus();
        let mut coefficients = vec![0u64; ring.degree()];
        reader.read_u64_into::<LittleEndian>(&mut coefficients)?;
        if let Some(c) = coefficients.iter().find(|&&c| c >= q) {
            return Err(AlgebraError::Deserialization(format!(
                "coefficient {} is not reduced modulo {}",
                c, q
            )));
        }
        Ok(ModPolynomial::from_reduced(ring.clone(), coefficients))
    }
}

impl<T: RingElement + Encode> Encode for Vector<T> {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(dimension(self.len())?)?;
        for e in self.iter() {
            e.write_to(writer)?;
        }
        Ok(())
    }
}

impl<T> Decode for Vector<T>
where
    T: RingElement + Decode<Context = <T as RingElement>::Context>,
{
    type Context = <T as RingElement>::Context;

    fn read_from<R: Read>(reader: &mut R, ctx: &Self::Context) -> Result<Self> {
        let len = reader.read_u16::<LittleEndian>()? as usize;
        if len == 0 {
            return Err(AlgebraError::Deserialization("empty vector".to_string()));
        }
        Ok(Vector::from_entries(read_entries(reader, ctx, len)?))
    }
}

impl<T: RingElement + Encode> Encode for Matrix<T> {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<LittleEndian>(dimension(self.rows())?)?;
        writer.write_u16::<LittleEndian>(dimension(self.cols())?)?;
        for e in self.iter() {
            e.write_to(writer)?;
        }
        Ok(())
    }
}

impl<T> Decode for Matrix<T>
where
    T: RingElement + Decode<Context = <T as RingElement>::Context>,
{
    type Context = <T as RingElement>::Context;

    fn read_from<R: Read>(reader: &mut R, ctx: &Self::Context) -> Result<Self> {
        let rows = reader.read_u16::<LittleEndian>()? as usize;
        let cols = reader.read_u16::<LittleEndian>()? as usize;
        if rows == 0 || cols == 0 {
            return Err(AlgebraError::Deserialization(format!(
                "empty {}x{} matrix",
                rows, cols
            )));
        }
        Ok(Matrix::from_entries(rows, cols, read_entries(reader, ctx, rows * cols)?))
    }
}
