//! STL parser for binary and ASCII meshes

use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::geometry::{Mesh, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("truncated STL: header declares {declared} triangles but data holds {available}")]
    Truncated { declared: usize, available: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
    #[error("facet {facet} has a non-finite vertex")]
    NonFinite { facet: usize },
}

/// Reject meshes whose vertices would poison bounds and projection
fn check_finite(mesh: Mesh) -> Result<Mesh, StlError> {
    let bad = mesh.triangles.iter().position(|t| {
        t.vertices
            .iter()
            .any(|v| !v.position.iter().all(|c| c.is_finite()))
    });
    match bad {
        Some(facet) => Err(StlError::NonFinite { facet }),
        None => Ok(mesh),
    }
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let body = &data[HEADER_LEN..];
    let (facets, declared) = le_u32::<_, nom::error::Error<&[u8]>>(body)
        .map_err(|_| StlError::TooShort(data.len()))?;
    let declared = declared as usize;
    let available = facets.len() / FACET_LEN;
    if declared > available {
        return Err(StlError::Truncated {
            declared,
            available,
        });
    }

    let (_, triangles) = count(binary_facet, declared)(facets)
        .map_err(|_| StlError::Truncated { declared, available })?;

    check_finite(Mesh { triangles })
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = le_vector3(input)?;
    let (input, (a, b, c)) = tuple((le_vector3, le_vector3, le_vector3))(input)?;
    let (input, _attribute_bytes) = take(2usize)(input)?;

    let vertex = |p: Vector3<f32>| Vertex::new(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

fn le_vector3(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match ascii_solid(input) {
        Ok((_, mesh)) => check_finite(mesh),
        Err(e) => Err(StlError::Ascii(e.to_string())),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional solid name runs to the end of the line
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    Ok((input, Mesh { triangles }))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((ascii_vertex, ascii_vertex, ascii_vertex))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    let vertex = |p: Vector3<f32>| Vertex::new(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector3)(input)
}

fn ascii_vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}
