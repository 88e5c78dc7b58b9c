//! Tokenizer for a single GFF3/GTF record line.
//!
//! A [`GffLine`] is transient: it is folded into a [`crate::GffObj`] (as the
//! parent record or as one of its segments) and then dropped. Besides the
//! nine columns it carries the record classification and the dialect-specific
//! identifiers: GFF3 `ID`/`Parent`/`Name`, GTF `transcript_id`/`gene_id`, and
//! the legacy Jigsaw and Cufflinks shapes.

use crate::data_structs::enums::Strand;
use crate::error::{
    GffError,
    Result,
};
use crate::utils::{
    find_key,
    parse_uint_prefix,
    value_until_semicolon,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GffLine {
    /// Original record text.
    pub line:     String,
    /// 1-based position in the input, 0 when unknown.
    pub line_no:  usize,
    pub seqname:  String,
    pub track:    String,
    pub ftype:    String,
    /// Column 9; GTF attributes are normalized to `key=value` form.
    pub info:     String,
    pub fstart:   u32,
    pub fend:     u32,
    pub qstart:   u32,
    pub qend:     u32,
    pub qlen:     u32,
    pub score:    f64,
    pub strand:   Strand,
    pub phase:    char,
    pub id:       Option<String>,
    pub parent:   Option<String>,
    pub gname:    Option<String>,
    pub is_exon:  bool,
    pub is_cds:   bool,
    pub is_mrna:  bool,
}

impl GffLine {
    /// Tokenizes one record line.
    ///
    /// Returns `Ok(None)` for lines that are not data records (fewer than 8
    /// columns) and, when `transcripts_only` is set, for records that are
    /// neither exon, CDS nor transcript lines.
    pub fn parse(
        line: &str,
        line_no: usize,
        transcripts_only: bool,
    ) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\n', '\r']);
        let cols: Vec<&str> = line.splitn(9, '\t').collect();
        if cols.len() < 8 {
            return Ok(None);
        }

        let coord_err = |field: &'static str| GffError::Coordinate {
            field,
            line_no,
            line: line.to_string(),
        };
        let mut fstart = cols[3]
            .trim()
            .parse::<u32>()
            .map_err(|_| coord_err("start"))?;
        let mut fend = cols[4]
            .trim()
            .parse::<u32>()
            .map_err(|_| coord_err("end"))?;
        if fend < fstart {
            std::mem::swap(&mut fstart, &mut fend);
        }

        let score = match cols[5] {
            "." => 0.0,
            s => s
                .trim()
                .parse::<f64>()
                .map_err(|_| GffError::Score {
                    line_no,
                    line: line.to_string(),
                })?,
        };

        let strand = cols[6]
            .chars()
            .next()
            .and_then(Strand::from_char)
            .ok_or_else(|| GffError::Strand {
                strand: cols[6].to_string(),
                line_no,
                line: line.to_string(),
            })?;
        let phase = cols[7].chars().next().unwrap_or('.');

        let ftype = cols[2];
        let is_exon = ftype.to_ascii_lowercase().contains("exon");
        let is_cds = !is_exon && ftype.eq_ignore_ascii_case("CDS");
        let is_mrna = !is_exon
            && !is_cds
            && (ftype.eq_ignore_ascii_case("mRNA") || ftype.eq_ignore_ascii_case("transcript"));

        if transcripts_only && !is_mrna && !is_cds && !is_exon {
            return Ok(None);
        }

        let mut gline = GffLine {
            line: line.to_string(),
            line_no,
            seqname: cols[0].to_string(),
            track: cols[1].to_string(),
            ftype: ftype.to_string(),
            info: cols.get(8).copied().unwrap_or_default().to_string(),
            fstart,
            fend,
            qstart: 0,
            qend: 0,
            qlen: 0,
            score,
            strand,
            phase,
            id: None,
            parent: None,
            gname: None,
            is_exon,
            is_cds,
            is_mrna,
        };
        gline.extract_ids()?;
        gline.extract_query_extent()?;
        Ok(Some(gline))
    }

    pub fn is_parent(&self) -> bool { self.parent.is_none() }

    fn err_attrs(&self) -> GffError {
        GffError::UnrecognizedAttributes {
            line_no: self.line_no,
            line:    self.line.clone(),
        }
    }

    fn extract_ids(&mut self) -> Result<()> {
        if let Some(pos) = find_key(&self.info, "ID=", false) {
            self.id = Some(value_until_semicolon(&self.info, pos).to_string());
            if let Some(pos) = find_key(&self.info, "Name=", false) {
                self.gname = Some(value_until_semicolon(&self.info, pos).to_string());
            }
        }
        // transcript lines may name a gene parent; it is not needed here
        if !self.is_mrna {
            if let Some(pos) = find_key(&self.info, "Parent=", true) {
                self.parent = Some(value_until_semicolon(&self.info, pos).to_string());
            }
        }
        if self.id.is_some() || self.parent.is_some() {
            return Ok(());
        }

        if find_key(&self.info, "transcript_id", false).is_some() {
            return self.extract_gtf_ids();
        }
        self.extract_legacy_ids()
    }

    fn extract_gtf_ids(&mut self) -> Result<()> {
        let transcript_id = self.quoted_value("transcript_id")?;
        if self.is_mrna {
            // a transcript line declared ahead of its exons is the parent
            self.id = Some(transcript_id);
        }
        else {
            self.parent = Some(transcript_id);
        }
        if find_key(&self.info, "gene_id", false).is_some() {
            self.gname = Some(self.quoted_value("gene_id")?);
        }
        self.info = normalize_gtf_attrs(&self.info);
        Ok(())
    }

    fn quoted_value(
        &self,
        key: &'static str,
    ) -> Result<String> {
        let quote_err = |what: &'static str| GffError::MissingQuote {
            key,
            what,
            line_no: self.line_no,
            line: self.line.clone(),
        };
        let pos = find_key(&self.info, key, false).ok_or_else(|| quote_err("opening"))?;
        let rest = &self.info[pos..];
        let open = rest.find('"').ok_or_else(|| quote_err("opening"))?;
        let rest = &rest[open + 1..];
        let close = rest.find('"').ok_or_else(|| quote_err("closing"))?;
        Ok(rest[..close].to_string())
    }

    fn extract_legacy_ids(&mut self) -> Result<()> {
        if !self.ftype.contains("exon") {
            return Err(self.err_attrs());
        }
        if self.track.starts_with("jigsaw") {
            self.is_cds = true;
            self.track = "jigsaw".to_string();
            match self.info.split_once(';') {
                Some((parent, rest)) => {
                    self.parent = Some(parent.to_string());
                    self.info = rest.to_string();
                },
                None => self.parent = Some(self.info.clone()),
            }
            return Ok(());
        }
        let token = self.info.trim().trim_end_matches(';');
        if token.is_empty() || token.contains(|c: char| c.is_whitespace() || c == ';') {
            return Err(self.err_attrs());
        }
        self.parent = Some(token.to_string());
        Ok(())
    }

    fn extract_query_extent(&mut self) -> Result<()> {
        let target_err = |what: &'static str| GffError::Target {
            what,
            line_no: self.line_no,
            line: self.line.clone(),
        };

        if let Some(pos) = find_key(&self.info, "Target=", false) {
            let value = value_until_semicolon(&self.info, pos);
            let mut fields = value.split(' ').filter(|s| !s.is_empty());
            let _target_ref = fields.next();
            let qstart = fields
                .next()
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| target_err("target start"))?;
            let qend = fields
                .next()
                .and_then(|s| s.parse::<u32>().ok())
                .ok_or_else(|| target_err("target end"))?;
            self.qstart = qstart;
            self.qend = qend;
        }
        else if let Some(pos) = find_key(&self.info, "Qreg=", true) {
            let (qstart, rest) =
                parse_uint_prefix(&self.info[pos..]).ok_or_else(|| target_err("target start"))?;
            let rest = rest
                .strip_prefix('-')
                .ok_or_else(|| target_err("next target"))?;
            let (qend, rest) = parse_uint_prefix(rest).ok_or_else(|| target_err("target end"))?;
            self.qstart = qstart;
            self.qend = qend;
            if let Some(rest) = rest.strip_prefix('|') {
                let (qlen, _) = parse_uint_prefix(rest).ok_or_else(|| target_err("Qreg length"))?;
                self.qlen = qlen;
            }
        }

        if self.qlen == 0 {
            if let Some(pos) = find_key(&self.info, "Qlen=", true) {
                let (qlen, _) =
                    parse_uint_prefix(&self.info[pos..]).ok_or_else(|| target_err("Qlen"))?;
                self.qlen = qlen;
            }
        }
        Ok(())
    }
}

/// Rewrites the first space after each attribute key to `=`, turning
/// `gene_id "g1"; transcript_id "t1";` into `gene_id="g1"; transcript_id="t1";`.
/// Later spaces inside a value are left alone.
pub fn normalize_gtf_attrs(info: &str) -> String {
    let mut out = String::with_capacity(info.len());
    let mut edited = false;
    let mut seen_non_space = false;
    for c in info.chars() {
        match c {
            ' ' if seen_non_space && !edited => {
                out.push('=');
                edited = true;
                continue;
            },
            ' ' => {},
            ';' => {
                edited = false;
                seen_non_space = false;
                out.push(c);
                continue;
            },
            _ => seen_non_space = true,
        }
        out.push(c);
    }
    out
}
