use crate::scene::material::MaterialLibrary;
use log::{debug, info, warn};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Directory prefix of `path`: everything up to and including the last `/` or `\`.
///
/// Returns an empty string when the path has no separator.
pub fn directory_prefix(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// Resolves a file referenced from an OBJ (`mtllib`, `map_Kd`) against the OBJ's directory.
pub fn resolve_relative(obj_path: &str, file_name: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", directory_prefix(obj_path), file_name))
}

/// Loads an MTL file into `library`.
///
/// A missing or unreadable file is not an error: the library keeps whatever
/// it held before and `false` is returned.
pub fn load_mtl<P: AsRef<Path>>(path: P, library: &mut MaterialLibrary) -> bool {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Could not open MTL file '{}': {}", path.display(), e);
            return false;
        }
    };

    info!("Loading MTL file: {}", path.display());
    parse_mtl(BufReader::new(file), library);
    true
}

/// Parses MTL text into `library`.
///
/// `newmtl` (re)creates an entry and makes it current; `Ka`, `Kd`, `Ks` and
/// `map_Kd` write into the current entry. Unknown directives are ignored.
/// A read error stops parsing and keeps what was parsed so far.
pub fn parse_mtl<R: BufRead>(reader: R, library: &mut MaterialLibrary) {
    let mut current = String::new();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("Stopped reading MTL data: {}", e);
                break;
            }
        };
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "newmtl" => {
                current = tokens.next().unwrap_or_default().to_string();
                library.reset(&current);
                info!("Material: {}", current);
            }
            "Ka" => read_rgb(&mut tokens, &mut library.entry(&current).ambient),
            "Kd" => read_rgb(&mut tokens, &mut library.entry(&current).diffuse),
            "Ks" => read_rgb(&mut tokens, &mut library.entry(&current).specular),
            "map_Kd" => {
                if let Some(file) = tokens.next() {
                    info!("Texture file: {}", file);
                    library.entry(&current).texture_file = file.to_string();
                }
            }
            other => debug!("Ignoring MTL directive '{}'", other),
        }
    }
}

/// Overwrites up to three components; components with no operand keep their value.
fn read_rgb<'a>(tokens: &mut impl Iterator<Item = &'a str>, target: &mut Vector3<f32>) {
    for (slot, tok) in target.iter_mut().zip(tokens) {
        *slot = tok.parse().unwrap_or(0.0);
    }
}
