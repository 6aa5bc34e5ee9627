//! Synthetic container builder for tests

use byteorder::{WriteBytesExt, LE};

use crate::crypto::{apply_ctr, apply_ofb};
use crate::header::HEADER_SIZE;
use crate::table::RECORD_HEADER_SIZE;
use crate::FormatVersion;

struct PendingFile {
    path: Vec<u8>,
    data: Vec<u8>,
    size_override: Option<u32>,
}

/// Builds an encrypted container from known plaintext files
pub struct ContainerBuilder {
    version: FormatVersion,
    files: Vec<PendingFile>,
    count_override: Option<u32>,
}

impl ContainerBuilder {
    pub fn new(version: FormatVersion) -> Self {
        Self {
            version,
            files: Vec::new(),
            count_override: None,
        }
    }

    pub fn file(self, path: &str, data: &[u8]) -> Self {
        self.raw_path_file(path.as_bytes(), data)
    }

    pub fn raw_path_file(mut self, path: &[u8], data: &[u8]) -> Self {
        self.files.push(PendingFile {
            path: path.to_vec(),
            data: data.to_vec(),
            size_override: None,
        });
        self
    }

    /// Add a file whose table record claims `declared` bytes
    pub fn file_with_declared_size(mut self, path: &str, data: &[u8], declared: u32) -> Self {
        self.files.push(PendingFile {
            path: path.as_bytes().to_vec(),
            data: data.to_vec(),
            size_override: Some(declared),
        });
        self
    }

    /// Write a header entry count that differs from the table
    pub fn declared_count(mut self, count: u32) -> Self {
        self.count_override = Some(count);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let params = self.version.params();

        let table_len: usize = self
            .files
            .iter()
            .map(|f| RECORD_HEADER_SIZE + f.path.len())
            .sum();
        let table_end = HEADER_SIZE + table_len;

        let mut table = Vec::with_capacity(table_len);
        let mut body = Vec::new();
        for (index, file) in self.files.iter().enumerate() {
            let offset = table_end + body.len();
            let size = file.size_override.unwrap_or(file.data.len() as u32);

            table.write_u32::<LE>(offset as u32).unwrap();
            table.write_u32::<LE>(size).unwrap();
            table.write_u32::<LE>(file.path.len() as u32).unwrap();
            table.extend_from_slice(&file.path);

            let mut payload = file.data.clone();
            apply_ctr(&params.key, &params.file_iv(index as u32), &mut payload);
            body.extend_from_slice(&payload);
        }
        apply_ctr(&params.key, &params.table_iv, &mut table);

        let mut header = Vec::with_capacity(HEADER_SIZE);
        header.write_u32::<LE>(0).unwrap();
        header
            .write_u32::<LE>(self.count_override.unwrap_or(self.files.len() as u32))
            .unwrap();
        header.write_u32::<LE>(table_end as u32).unwrap();
        header.write_u32::<LE>(0).unwrap();
        apply_ofb(&params.key, &params.header_iv, &mut header);

        let mut out = header;
        out.extend_from_slice(&table);
        out.extend_from_slice(&body);
        out
    }
}
