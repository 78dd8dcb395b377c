//! Shared helpers for building synthetic BFAST containers in memory

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

/// Serialize a BFAST container from a raw name blob and data buffers
///
/// The name blob becomes array 0 as-is, so callers can produce containers
/// whose name table deliberately disagrees with the buffer count.
pub fn build_bfast_raw(name_blob: &[u8], buffers: &[&[u8]]) -> Vec<u8> {
    let num_arrays = buffers.len() + 1;
    let data_start = 32 + num_arrays * 16;
    let data_len: usize = name_blob.len() + buffers.iter().map(|b| b.len()).sum::<usize>();
    let data_end = data_start + data_len;

    let mut out = Vec::with_capacity(data_end);
    for word in [
        0xBFA5,
        0,
        data_start as u32,
        0,
        data_end as u32,
        0,
        num_arrays as u32,
        0,
    ] {
        out.write_u32::<LittleEndian>(word).unwrap();
    }

    let mut cursor = data_start;
    let sizes = std::iter::once(name_blob.len()).chain(buffers.iter().map(|b| b.len()));
    for size in sizes {
        out.write_u32::<LittleEndian>(cursor as u32).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>((cursor + size) as u32).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        cursor += size;
    }

    out.extend_from_slice(name_blob);
    for buffer in buffers {
        out.extend_from_slice(buffer);
    }
    out
}

/// Serialize a well-formed BFAST container from named buffers
pub fn build_bfast(arrays: &[(&str, &[u8])]) -> Vec<u8> {
    let mut name_blob = Vec::new();
    for (name, _) in arrays {
        name_blob.extend_from_slice(name.as_bytes());
        name_blob.push(0);
    }
    let buffers: Vec<&[u8]> = arrays.iter().map(|&(_, data)| data).collect();
    build_bfast_raw(&name_blob, &buffers)
}

/// Little-endian bytes of a slice of i32 values
pub fn ints_le(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Little-endian bytes of a slice of f32 values
pub fn floats_le(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
