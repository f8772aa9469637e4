use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to open OBJ file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read OBJ data: {0}")]
    Read(#[from] std::io::Error),
}

/// Result of parsing an OBJ file.
#[derive(Debug, Clone, Default)]
pub struct ObjData {
    pub mesh: Mesh,
    /// Filename from the first `mtllib` directive, if any.
    pub material_library: Option<String>,
}

/// Loads an OBJ file from disk.
///
/// Fails only when the file can't be opened or read. No partial mesh is ever returned.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ObjData, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loading OBJ file: {}", path.display());
    let data = parse_obj(BufReader::new(file))?;
    info!("nVertices: {}", data.mesh.vertex_count());
    Ok(data)
}

/// Parses OBJ text into a flat triangle list.
///
/// Supported directives: `v`, `vt`, `vn`, `f` and `mtllib`. Everything else is ignored.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjData, ObjError> {
    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut texcoords: Vec<Vector2<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut material_library: Option<String> = None;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "mtllib" => {
                if material_library.is_none() {
                    material_library = tokens.next().map(str::to_string);
                }
            }
            "v" => {
                let [x, y, z] = read_floats::<3>(&mut tokens);
                positions.push(Point3::new(x, y, z));
            }
            "vt" => {
                let [s, t] = read_floats::<2>(&mut tokens);
                texcoords.push(Vector2::new(s, t));
            }
            "vn" => {
                let [x, y, z] = read_floats::<3>(&mut tokens);
                normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let mut corners = 0;
                for corner in tokens {
                    let refs = CornerRef::parse(corner);
                    let position = resolve_position(refs.vertex, &positions, line_idx + 1);
                    let texcoord = lookup(refs.texcoord, &texcoords).unwrap_or_else(Vector2::zeros);
                    let normal = lookup(refs.normal, &normals).unwrap_or_else(Vector3::zeros);
                    vertices.push(Vertex::new(position, texcoord, normal));
                    corners += 1;
                }
                if corners != 3 {
                    warn!(
                        "Line {}: face has {} corners; only triangulated faces render correctly",
                        line_idx + 1,
                        corners
                    );
                }
            }
            other => debug!("Ignoring OBJ directive '{}'", other),
        }
    }

    debug!(
        "Parsed {} positions, {} texcoords, {} normals",
        positions.len(),
        texcoords.len(),
        normals.len()
    );

    Ok(ObjData {
        mesh: Mesh::new(vertices),
        material_library,
    })
}

/// One sub-index of a face corner, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjIndex {
    /// Empty, missing, zero or unparsable.
    Absent,
    /// 1-based index counted from the start of the attribute list.
    Absolute(u64),
    /// `-k` counts back from the last attribute parsed so far.
    Relative(u64),
}

impl ObjIndex {
    fn parse(part: &str) -> Self {
        match part.parse::<i64>() {
            Ok(idx) if idx > 0 => Self::Absolute(idx as u64),
            Ok(idx) if idx < 0 => Self::Relative(idx.unsigned_abs()),
            _ => Self::Absent,
        }
    }

    /// Resolves to a 0-based slot in a list of `len` attributes.
    fn resolve(self, len: usize) -> Option<usize> {
        let len = len as u64;
        let idx = match self {
            Self::Absent => return None,
            Self::Absolute(n) => n - 1,
            Self::Relative(n) => len.checked_sub(n)?,
        };
        (idx < len).then_some(idx as usize)
    }

    /// The number as written in the file (0 when absent).
    fn as_written(self) -> i64 {
        match self {
            Self::Absent => 0,
            Self::Absolute(n) => n as i64,
            Self::Relative(n) => -(n as i64),
        }
    }
}

/// The three sub-indices of a `vi[/ti[/ni]]` face corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CornerRef {
    vertex: ObjIndex,
    texcoord: ObjIndex,
    normal: ObjIndex,
}

impl CornerRef {
    fn parse(token: &str) -> Self {
        let mut parts = token.splitn(3, '/');
        let mut next = || parts.next().map_or(ObjIndex::Absent, ObjIndex::parse);
        let vertex = next();
        let texcoord = next();
        let normal = next();
        Self {
            vertex,
            texcoord,
            normal,
        }
    }
}

/// Absent or unresolvable vertex indices alias the first position
/// (the origin when none has been parsed yet).
fn resolve_position(index: ObjIndex, positions: &[Point3<f32>], line: usize) -> Point3<f32> {
    let fallback = positions.first().copied().unwrap_or_else(Point3::origin);
    match index {
        ObjIndex::Absent => fallback,
        _ => lookup(index, positions).unwrap_or_else(|| {
            warn!(
                "Line {}: vertex index {} is out of range ({} positions parsed)",
                line,
                index.as_written(),
                positions.len()
            );
            fallback
        }),
    }
}

fn lookup<T: Copy>(index: ObjIndex, items: &[T]) -> Option<T> {
    index.resolve(items.len()).map(|idx| items[idx])
}

fn read_floats<const N: usize>(tokens: &mut SplitWhitespace<'_>) -> [f32; N] {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        match tokens.next() {
            Some(tok) => *slot = tok.parse().unwrap_or(0.0),
            None => break,
        }
    }
    out
}
