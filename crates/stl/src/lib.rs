use byteorder::{LittleEndian, ReadBytesExt};
use plumb_mesh::{Triangle, TriangleMesh, Vector3};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const HEADER_LEN: u64 = 80;
// normal + 3 points (12 floats) followed by a u16 attribute count.
const FACET_LEN: u64 = 12 * 4 + 2;

fn read_vector<T: Read>(f: &mut T) -> std::io::Result<Vector3> {
    Ok(Vector3 {
        x: f.read_f32::<LittleEndian>()?,
        y: f.read_f32::<LittleEndian>()?,
        z: f.read_f32::<LittleEndian>()?,
    })
}

fn read_binary<M: TriangleMesh, T: Read + Seek>(f: &mut T) -> std::io::Result<M> {
    // The 80 byte header is free form and carries nothing we read.
    f.seek(SeekFrom::Start(HEADER_LEN))?;

    // Facet count, little endian u32.
    let n_triangles = f.read_u32::<LittleEndian>()? as u64;

    // Refuse to allocate for a count the stream cannot possibly hold.
    let start = f.stream_position()?;
    let end = f.seek(SeekFrom::End(0))?;
    f.seek(SeekFrom::Start(start))?;
    if end - start < n_triangles * FACET_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "stl declares {} triangles but only {} bytes of facet data follow",
                n_triangles,
                end - start
            ),
        ));
    }

    let mut data = Vec::<Triangle>::with_capacity(n_triangles as usize);
    for _ in 0..n_triangles {
        // Stored facet normals are frequently zero. Winding order is used instead.
        let _normal = read_vector(f)?;
        let p0 = read_vector(f)?;
        let p1 = read_vector(f)?;
        let p2 = read_vector(f)?;
        data.push(Triangle::new(p0, p1, p2));
        // Trailing u16 per facet, vendor specific and skipped.
        let _attribute_byte_count = f.read_u16::<LittleEndian>()?;
    }
    log::debug!("read {} stl facets", data.len());
    Ok(M::from_triangles(data))
}

pub fn read_stl<M: TriangleMesh, P: AsRef<Path>>(p: P) -> std::io::Result<M> {
    let mut f = std::io::BufReader::new(std::fs::File::open(p)?);
    read_binary(&mut f)
}

pub fn parse_stl<M: TriangleMesh>(data: &[u8]) -> std::io::Result<M> {
    let mut c = std::io::Cursor::new(data);
    read_binary(&mut c)
}

pub trait StlReader: Read {
    fn read_stl<M: TriangleMesh>(&mut self) -> std::io::Result<M>;
}

impl<T: Read + Seek> StlReader for T {
    fn read_stl<M: TriangleMesh>(&mut self) -> std::io::Result<M> {
        read_binary(self)
    }
}
