//! Supported immigration document types and their field sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// Immigration document type handled by the extraction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// Surat Keterangan Tempat Tinggal (residence certificate).
    Sktt,
    /// Electronic visa approval letter.
    Evln,
    /// Izin Tinggal Terbatas (limited stay permit).
    Itas,
    /// Izin Tinggal Kunjungan (visit stay permit).
    Itk,
    /// Foreign worker notification (notifikasi).
    #[serde(alias = "NOTIFIKASI")]
    Notification,
    /// Foreign worker compensation fund payment letter.
    Dkptka,
}

const SKTT_FIELDS: &[&str] = &[
    "NIK",
    "Name",
    "Jenis Kelamin",
    "Place of Birth",
    "Date of Birth",
    "Nationality",
    "Occupation",
    "Address",
    "KITAS/KITAP",
    "Passport Expiry",
    "Date Issue",
];

const EVLN_FIELDS: &[&str] = &[
    "Name",
    "Place of Birth",
    "Date of Birth",
    "Passport No",
    "Passport Expiry",
    "Date Issue",
];

const PERMIT_FIELDS: &[&str] = &[
    "Name",
    "Permit Number",
    "Stay Permit Expiry",
    "Place & Date of Birth",
    "Passport Number",
    "Passport Expiry",
    "Nationality",
    "Gender",
    "Address",
    "Occupation",
    "Guarantor",
    "Date Issue",
];

const NOTIFICATION_FIELDS: &[&str] = &[
    "Nomor Keputusan",
    "Nama TKA",
    "Tempat/Tanggal Lahir",
    "Kewarganegaraan",
    "Alamat Tempat Tinggal",
    "Nomor Paspor",
    "Jabatan",
    "Lokasi Kerja",
    "Berlaku",
    "Date Issue",
];

const DKPTKA_FIELDS: &[&str] = &[
    "Nama Pemberi Kerja",
    "Alamat",
    "No Telepon",
    "Email",
    "Nama TKA",
    "Tempat/Tanggal Lahir",
    "Nomor Paspor",
    "Kewarganegaraan",
    "Jabatan",
    "Kanim",
    "Lokasi Kerja",
    "Jangka Waktu",
    "Tanggal Penerbitan",
    "Kode Billing Pembayaran",
    "No Rekening",
    "DKPTKA",
];

const DKPTKA_REQUIRED: &[&str] = &[
    "Nama Pemberi Kerja",
    "Nama TKA",
    "Nomor Paspor",
    "Kewarganegaraan",
    "Jabatan",
    "DKPTKA",
];

impl DocumentType {
    /// All supported document types.
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Sktt,
        DocumentType::Evln,
        DocumentType::Itas,
        DocumentType::Itk,
        DocumentType::Notification,
        DocumentType::Dkptka,
    ];

    /// Canonical label stored in the record's `document_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Sktt => "SKTT",
            DocumentType::Evln => "EVLN",
            DocumentType::Itas => "ITAS",
            DocumentType::Itk => "ITK",
            DocumentType::Notification => "NOTIFICATION",
            DocumentType::Dkptka => "DKPTKA",
        }
    }

    /// Human-readable document name.
    pub fn description(&self) -> &'static str {
        match self {
            DocumentType::Sktt => "Surat Keterangan Tempat Tinggal",
            DocumentType::Evln => "Electronic Visa (EVLN)",
            DocumentType::Itas => "Izin Tinggal Terbatas",
            DocumentType::Itk => "Izin Tinggal Kunjungan",
            DocumentType::Notification => "Notifikasi Penggunaan TKA",
            DocumentType::Dkptka => "Dana Kompensasi Penggunaan TKA",
        }
    }

    /// Ordered field set every record of this type carries.
    pub fn expected_fields(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Sktt => SKTT_FIELDS,
            DocumentType::Evln => EVLN_FIELDS,
            DocumentType::Itas | DocumentType::Itk => PERMIT_FIELDS,
            DocumentType::Notification => NOTIFICATION_FIELDS,
            DocumentType::Dkptka => DKPTKA_FIELDS,
        }
    }

    /// Fields whose absence makes a record incomplete.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Dkptka => DKPTKA_REQUIRED,
            _ => &[],
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SKTT" => Ok(DocumentType::Sktt),
            "EVLN" => Ok(DocumentType::Evln),
            "ITAS" => Ok(DocumentType::Itas),
            "ITK" => Ok(DocumentType::Itk),
            "NOTIFIKASI" | "NOTIFICATION" => Ok(DocumentType::Notification),
            "DKPTKA" => Ok(DocumentType::Dkptka),
            _ => Err(ExtractionError::UnsupportedDocumentType(s.to_string())),
        }
    }
}
