/// Wavefront OBJ parser producing indexed triangle geometry
use std::path::Path;

use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, space0, space1, u32 as index},
    combinator::{all_consuming, opt},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{ObjError, ObjResult};
use crate::geometry::Geometry;

/// Keywords that are recognised but carry nothing the viewer uses
const IGNORED_KEYWORDS: &[&str] = &["vt", "o", "g", "s", "mtllib", "usemtl"];

/// Read and parse an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<Geometry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let geometry = parse_obj(&text)?;
    log::info!(
        "loaded {} vertices, {} triangles from {}",
        geometry.vertex_count(),
        geometry.triangle_count(),
        path.display()
    );
    Ok(geometry)
}

/// Parse OBJ text into geometry buffers.
///
/// Only `v`, `vn` and `f` statements are used. Face indices are converted
/// to 0-based, each face `a b c` is stored with flipped winding as
/// `a c b`, and larger polygons are fanned around their first vertex.
/// Without `vn` statements, normals are generated from the faces.
pub fn parse_obj(input: &str) -> ObjResult<Geometry> {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    // Largest index of each face with its line, checked once all vertices are known
    let mut face_extents = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line_no = number + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (rest, keyword) = keyword(line).map_err(|_| parse_error(line_no, "missing keyword"))?;
        match keyword {
            "v" => {
                let (_, v) = all_consuming(vertex_args)(rest)
                    .map_err(|_| parse_error(line_no, "expected `v x y z [w]`"))?;
                vertices.extend_from_slice(&v);
            }
            "vn" => {
                let (_, n) = all_consuming(normal_args)(rest)
                    .map_err(|_| parse_error(line_no, "expected `vn x y z`"))?;
                normals.extend_from_slice(&n);
            }
            "f" => {
                let (_, face) = all_consuming(face_args)(rest)
                    .map_err(|_| parse_error(line_no, "expected `f i j k ...`"))?;
                let largest = push_face(&mut indices, &face, line_no)?;
                face_extents.push((line_no, largest));
            }
            other if IGNORED_KEYWORDS.contains(&other) => {
                log::debug!("ignoring `{}` on line {}", other, line_no);
            }
            other => {
                return Err(parse_error(
                    line_no,
                    &format!("unknown line type `{}`", other),
                ));
            }
        }
    }

    let vertex_count = vertices.len() / 3;
    if let Some(&(line_no, largest)) = face_extents
        .iter()
        .find(|&&(_, largest)| usize::from(largest) >= vertex_count)
    {
        return Err(parse_error(
            line_no,
            &format!(
                "face index {} is past the last of {} vertices",
                usize::from(largest) + 1,
                vertex_count
            ),
        ));
    }

    if normals.is_empty() {
        return Ok(Geometry::with_generated_normals(vertices, indices)?);
    }
    if normals.len() != vertices.len() {
        log::warn!(
            "{} normals for {} vertices, generating normals instead",
            normals.len() / 3,
            vertices.len() / 3
        );
        return Ok(Geometry::with_generated_normals(vertices, indices)?);
    }
    Ok(Geometry::new(vertices, normals, indices)?)
}

fn parse_error(line: usize, message: &str) -> ObjError {
    ObjError::Parse {
        line,
        message: message.to_string(),
    }
}

/// Append one polygon as flipped triangles, returning its largest index
fn push_face(indices: &mut Vec<u16>, face: &[u32], line_no: usize) -> ObjResult<u16> {
    if face.len() < 3 {
        return Err(parse_error(line_no, "a face needs at least 3 vertices"));
    }

    let zero_based = face
        .iter()
        .map(|&i| {
            i.checked_sub(1)
                .and_then(|i| u16::try_from(i).ok())
                .ok_or_else(|| parse_error(line_no, &format!("face index {} is out of range", i)))
        })
        .collect::<ObjResult<Vec<u16>>>()?;

    for k in 1..zero_based.len() - 1 {
        indices.extend_from_slice(&[zero_based[0], zero_based[k + 1], zero_based[k]]);
    }
    Ok(zero_based.iter().copied().max().unwrap_or(0))
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, x) = preceded(space1, float)(input)?;
    let (input, y) = preceded(space1, float)(input)?;
    let (input, z) = preceded(space1, float)(input)?;
    Ok((input, [x, y, z]))
}

fn vertex_args(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, v) = vector3(input)?;
    let (input, _w) = opt(preceded(space1, float))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, v))
}

fn normal_args(input: &str) -> IResult<&str, [f32; 3]> {
    terminated(vector3, space0)(input)
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only the position index is kept
fn face_vertex(input: &str) -> IResult<&str, u32> {
    terminated(
        index,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

fn face_args(input: &str) -> IResult<&str, Vec<u32>> {
    terminated(many1(preceded(space1, face_vertex)), space0)(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector;

    const TRIANGLE: &str = "\
# a single triangle
v 0 0 0
v 1 0 0
v 0 1 0

f 1 2 3
";

    #[test]
    fn test_triangle_without_normals() {
        let geometry = parse_obj(TRIANGLE).unwrap();
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.normals().len(), 9);
        assert_eq!(geometry.indices(), &[0, 2, 1]);
        for i in 0..3 {
            assert!(vector::norm(geometry.normal(i)) > 0.0);
        }
    }

    #[test]
    fn test_unknown_line_type() {
        let err = parse_obj("v 0 0 0\nx 1 2 3\n").unwrap_err();
        match err {
            ObjError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("`x`"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_comments_and_whitespace() {
        let text = "v 0 0 0 # origin\r\nv 1 0 0\r\n  v 0 1 0  \r\nf 1 2 3 # face\r\n";
        let geometry = parse_obj(text).unwrap();
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn test_quad_is_fanned_and_flipped() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let geometry = parse_obj(text).unwrap();
        assert_eq!(geometry.indices(), &[0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_slashed_face_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1/1 2//1 3/1\n";
        let geometry = parse_obj(text).unwrap();
        assert_eq!(geometry.indices(), &[0, 2, 1]);
    }

    #[test]
    fn test_explicit_normals_are_kept() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 0 1\nvn 1 0 0\nf 1 2 3\n";
        let geometry = parse_obj(text).unwrap();
        assert_eq!(geometry.normal(2), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mismatched_normals_are_regenerated() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 1 0 0\nf 1 2 3\n";
        let geometry = parse_obj(text).unwrap();
        assert_eq!(geometry.normals().len(), 9);
        assert_eq!(geometry.normal(0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bad_numbers_and_faces() {
        assert!(matches!(
            parse_obj("v 1 a 2\n"),
            Err(ObjError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n"),
            Err(ObjError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n"),
            Err(ObjError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn test_index_past_vertices() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 9\n").unwrap_err();
        match err {
            ObjError::Parse { line, message } => {
                assert_eq!(line, 5);
                assert!(message.contains("face index 9"), "{}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_face_before_its_vertices() {
        let geometry = parse_obj("f 1 2 3\nv 0 0 0\nv 1 0 0\nv 0 1 0\n").unwrap();
        assert_eq!(geometry.indices(), &[0, 2, 1]);
    }

    #[test]
    fn test_ignored_keywords() {
        let text = "mtllib flake.mtl\no flake\ns off\n".to_string() + TRIANGLE;
        assert!(parse_obj(&text).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_obj("/nonexistent/snowflake.obj").unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
    }
}
