//! Gene model: one transcript (or other parent feature) with its ordered set
//! of exon intervals and coding extent.
//!
//! Invariants kept by every mutating method:
//!
//! * `exons` is sorted by `(start, end)` and holds no exact duplicates;
//! * `covlen` equals the sum of the exon lengths;
//! * `gstart`/`gend` match the first/last exon once any exon is present.

use std::io::Write;

use arcstr::ArcStr;
use log::{
    debug,
    warn,
};

use crate::data_structs::attributes::{
    parse_attrs,
    GffAttr,
};
use crate::data_structs::enums::{
    GxfFormat,
    PrintMode,
    SegmentKinds,
    Strand,
};
use crate::data_structs::exon::{
    CdsSegment,
    GffExon,
    Segment,
};
use crate::data_structs::gff_line::GffLine;
use crate::data_structs::names::{
    NamesRef,
    FID_EXON,
    FID_MRNA,
};
use crate::error::{
    GffError,
    Result,
};
use crate::io::config::GffReaderConfig;
use crate::utils::format_score;

/// Introns this short (or overlaps) between neighboring exons of a
/// transcript are merged or flagged.
pub const MAX_SHORT_INTRON: i64 = 5;

#[derive(Debug, Clone)]
pub struct GffObj {
    names:       NamesRef,
    gff_id:      String,
    gname:       Option<String>,
    seq_id:      usize,
    track_id:    usize,
    ftype_id:    usize,
    subftype_id: Option<usize>,
    strand:      Strand,
    gscore:      f64,
    gstart:      u32,
    gend:        u32,
    cd_start:    u32,
    cd_end:      u32,
    cd_phase:    char,
    is_cds:      bool,
    exons:       Vec<GffExon>,
    covlen:      u32,
    has_errors:  bool,
    qlen:        u32,
    qstart:      u32,
    qend:        u32,
    attrs:       Vec<GffAttr>,
}

impl GffObj {
    /// Creates an empty feature; `ftype` `"mRNA"` makes it a transcript.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        names: &NamesRef,
        id: &str,
        seqname: &str,
        track: &str,
        ftype: &str,
        strand: Strand,
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            names: names.clone(),
            gff_id: id.to_string(),
            gname: None,
            seq_id: names.add_seq(seqname),
            track_id: names.add_track(track),
            ftype_id: names.add_feature_type(ftype),
            subftype_id: None,
            strand,
            gscore: 0.0,
            gstart: start.min(end),
            gend: start.max(end),
            cd_start: 0,
            cd_end: 0,
            cd_phase: '.',
            is_cds: false,
            exons: Vec::new(),
            covlen: 0,
            has_errors: false,
            qlen: 0,
            qstart: 0,
            qend: 0,
            attrs: Vec::new(),
        }
    }

    /// Starts a feature from a tokenized record.
    ///
    /// A parent record (no parent reference) becomes the feature itself. A
    /// child record whose parent has not been seen starts a feature named
    /// after that parent and becomes its first segment.
    pub fn from_line(
        names: &NamesRef,
        line: &GffLine,
        config: &GffReaderConfig,
    ) -> Result<Self> {
        let mut obj = match &line.parent {
            Some(parent) => {
                let ftype_id = if line.is_cds || line.is_exon {
                    FID_MRNA
                }
                else {
                    names.add_feature_type(&line.ftype)
                };
                let mut obj = Self::bare(names, parent, line, ftype_id);
                obj.is_cds = line.is_cds;
                obj.add_exon_line(line, config.keep_attrs, config.merge_close_exons);
                if config.keep_attrs && config.no_exon_attrs {
                    if let Some(first) = obj.exons.first_mut() {
                        obj.attrs = std::mem::take(&mut first.attrs);
                    }
                }
                obj
            },
            None => {
                let id = line
                    .id
                    .as_deref()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| GffError::MissingId {
                        line_no: line.line_no,
                        line:    line.line.clone(),
                    })?;
                let ftype_id = if line.is_mrna {
                    FID_MRNA
                }
                else {
                    names.add_feature_type(&line.ftype)
                };
                let mut obj = Self::bare(names, id, line, ftype_id);
                obj.gscore = line.score;
                obj.qstart = line.qstart;
                obj.qend = line.qend;
                if config.keep_attrs {
                    obj.attrs = parse_attrs(names, &line.info);
                }
                obj
            },
        };
        obj.qlen = line.qlen;
        Ok(obj)
    }

    fn bare(
        names: &NamesRef,
        id: &str,
        line: &GffLine,
        ftype_id: usize,
    ) -> Self {
        Self {
            names: names.clone(),
            gff_id: id.to_string(),
            gname: line.gname.clone(),
            seq_id: names.add_seq(&line.seqname),
            track_id: names.add_track(&line.track),
            ftype_id,
            subftype_id: None,
            strand: line.strand,
            gscore: 0.0,
            gstart: line.fstart,
            gend: line.fend,
            cd_start: 0,
            cd_end: 0,
            cd_phase: '.',
            is_cds: false,
            exons: Vec::new(),
            covlen: 0,
            has_errors: false,
            qlen: 0,
            qstart: 0,
            qend: 0,
            attrs: Vec::new(),
        }
    }

    /// Folds a child record into this feature. Returns the index of the
    /// inserted (or merged) exon, or `None` when nothing was inserted.
    pub fn add_exon_line(
        &mut self,
        line: &GffLine,
        keep_attrs: bool,
        allow_merge: bool,
    ) -> Option<usize> {
        if self.ftype_id == FID_MRNA {
            self.subftype_id.get_or_insert(FID_EXON);
            if !line.is_cds && !line.is_exon {
                debug!("Ignoring {} subfeature of transcript {}", line.ftype, self.gff_id);
                return None;
            }
        }
        else {
            let subf_id = self.names.add_feature_type(&line.ftype);
            match self.subftype_id {
                None => self.subftype_id = Some(subf_id),
                Some(current) if current != subf_id => {
                    warn!(
                        "Multiple subfeatures ({} and {}) found for {}, only {} is kept",
                        self.subfeature_name(),
                        line.ftype,
                        self.gff_id,
                        self.subfeature_name()
                    );
                    self.has_errors = true;
                    return None;
                },
                Some(_) => {},
            }
        }

        let segment = Segment::new(line.fstart, line.fend)
            .with_score(line.score)
            .with_phase(line.phase)
            .with_query(line.qstart, line.qend);
        let idx = self.add_exon(segment, line.is_cds, allow_merge)?;
        if keep_attrs {
            let attrs = parse_attrs(&self.names, &line.info);
            self.exons[idx].attrs.extend(attrs);
        }
        Some(idx)
    }

    /// Inserts one segment into the exon set.
    ///
    /// CDS segments arriving before any exon are kept as surrogate exons
    /// (CDS-derived model) until a real exon shows up, which discards them.
    /// CDS segments arriving after real exons only widen the CDS extent and
    /// return `None`. With `allow_merge`, a transcript exon within
    /// [`MAX_SHORT_INTRON`] bases of a neighbor is merged into the closer one.
    /// Merging only looks at the new exon's immediate neighbors, so a middle
    /// exon arriving after both of its neighbors can leave a short intron
    /// behind on its other side.
    pub fn add_exon(
        &mut self,
        segment: Segment,
        is_cds_segment: bool,
        allow_merge: bool,
    ) -> Option<usize> {
        if self.exons.is_empty() {
            if is_cds_segment {
                self.is_cds = true;
            }
            if self.subftype_id.is_none() {
                self.subftype_id = Some(if self.ftype_id == FID_MRNA {
                    FID_EXON
                }
                else {
                    self.ftype_id
                });
            }
        }
        if self.is_cds && !is_cds_segment {
            // CDS segments came first: the extent and phase stay, the
            // surrogate exons go
            debug!("Dropping surrogate CDS exons of {}", self.gff_id);
            self.is_cds = false;
            self.exons.clear();
            self.covlen = 0;
        }
        if is_cds_segment && !self.is_cds {
            if self.cd_start == 0 || segment.start < self.cd_start {
                self.cd_start = segment.start;
                if self.strand == Strand::Forward {
                    self.cd_phase = segment.phase;
                }
            }
            if segment.end > self.cd_end {
                if self.strand == Strand::Reverse {
                    self.cd_phase = segment.phase;
                }
                self.cd_end = segment.end;
            }
            return None;
        }

        let (mut qstart, mut qend) = (segment.qstart, segment.qend);
        if qstart != 0 || qend != 0 {
            if qstart > qend {
                std::mem::swap(&mut qstart, &mut qend);
            }
            qstart = qstart.max(1);
        }
        let exon = GffExon {
            start: segment.start.min(segment.end),
            end: segment.start.max(segment.end),
            score: segment.score,
            phase: segment.phase,
            qstart,
            qend,
            attrs: Vec::new(),
        };

        let mut eidx = match self.exons.binary_search(&exon) {
            Ok(_) => {
                warn!(
                    "Duplicate exon {}-{} rejected for {}",
                    exon.start, exon.end, self.gff_id
                );
                self.has_errors = true;
                return None;
            },
            Err(pos) => {
                self.exons.insert(pos, exon);
                pos
            },
        };

        let d1 = if eidx > 0 {
            self.exons[eidx].start as i64 - self.exons[eidx - 1].end as i64 - 1
        }
        else {
            i64::MAX
        };
        let d2 = if eidx + 1 < self.exons.len() {
            self.exons[eidx + 1].start as i64 - self.exons[eidx].end as i64 - 1
        }
        else {
            i64::MAX
        };
        let d = d1.min(d2);
        if d < 0 {
            warn!("Overlapping segments for GFF Id '{}'", self.gff_id);
            self.has_errors = true;
        }
        if d <= MAX_SHORT_INTRON && self.ftype_id == FID_MRNA {
            if allow_merge {
                if d1 <= d2 {
                    let prev = self.exons.remove(eidx - 1);
                    eidx -= 1;
                    self.covlen -= prev.len();
                    let merged = &mut self.exons[eidx];
                    merged.start = merged.start.min(prev.start);
                    merged.end = merged.end.max(prev.end);
                }
                else {
                    let next = self.exons.remove(eidx + 1);
                    self.covlen -= next.len();
                    let merged = &mut self.exons[eidx];
                    merged.end = merged.end.max(next.end);
                }
                debug!(
                    "Merged close exons of {} into {}-{}",
                    self.gff_id, self.exons[eidx].start, self.exons[eidx].end
                );
            }
            else {
                warn!("Very short intron ({}) for GFF Id '{}'", d, self.gff_id);
                self.has_errors = true;
            }
        }
        self.covlen += self.exons[eidx].len();
        self.sync_bounds();

        if is_cds_segment && self.is_cds {
            self.cd_start = self.gstart;
            self.cd_end = self.gend;
            self.cd_phase = self.five_prime_phase();
        }
        Some(eidx)
    }

    /// Removes the exon at `idx`; out-of-range indices are ignored.
    ///
    /// The coverage update assumes exons do not overlap.
    pub fn remove_exon(
        &mut self,
        idx: usize,
    ) {
        if idx >= self.exons.len() {
            return;
        }
        let removed = self.exons.remove(idx);
        self.covlen = self.covlen.saturating_sub(removed.len());
        self.sync_bounds();
        if self.is_cds {
            self.cd_start = self.gstart;
            self.cd_end = self.gend;
        }
    }

    fn sync_bounds(&mut self) {
        if let (Some(first), Some(last)) = (self.exons.first(), self.exons.last()) {
            self.gstart = first.start;
            self.gend = last.end;
        }
    }

    fn five_prime_phase(&self) -> char {
        let exon = if self.strand == Strand::Reverse {
            self.exons.last()
        }
        else {
            self.exons.first()
        };
        exon.map(|e| e.phase).unwrap_or('.')
    }

    /// Initial phase digit of the CDS (0 when unset).
    pub fn phase_offset(&self) -> u32 {
        match self.cd_phase {
            '1' => 1,
            '2' => 2,
            _ => 0,
        }
    }

    /// CDS extent with the initial phase bases skipped on the 5' side;
    /// `(0, 0)` without a CDS. At least one base is always left.
    pub fn cds_ends(&self) -> (u32, u32) {
        if !self.has_cds() {
            return (0, 0);
        }
        let adj = self
            .phase_offset()
            .min(self.cd_end.saturating_sub(self.cd_start));
        if self.strand == Strand::Reverse {
            (self.cd_start, self.cd_end - adj)
        }
        else {
            (self.cd_start + adj, self.cd_end)
        }
    }

    /// Intersection of each exon with the CDS extent, in transcript order,
    /// with the phase of every piece.
    pub fn cds_segments(&self) -> Vec<CdsSegment> {
        if !self.has_cds() {
            return Vec::new();
        }
        let mut consumed: u32 = match self.phase_offset() {
            0 => 0,
            adj => 3 - adj,
        };
        let order: Box<dyn Iterator<Item = usize>> = if self.strand == Strand::Reverse {
            Box::new((0..self.exons.len()).rev())
        }
        else {
            Box::new(0..self.exons.len())
        };

        let mut segments = Vec::new();
        for x in order {
            let exon = &self.exons[x];
            if self.cd_end < exon.start || self.cd_start > exon.end {
                continue;
            }
            let start = exon.start.max(self.cd_start);
            let end = exon.end.min(self.cd_end);
            let phase = (3 - consumed % 3) % 3;
            segments.push(CdsSegment {
                start,
                end,
                phase: char::from(b'0' + phase as u8),
                exon_idx: x,
            });
            consumed += end - start + 1;
        }
        segments
    }

    pub fn add_attr(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) {
        let attr_id = self.names.add_attr(name);
        self.attrs.push(GffAttr::new(attr_id, value));
    }

    /// First value of attribute `name`, if present.
    pub fn get_attr(
        &self,
        name: &str,
    ) -> Option<&str> {
        let attr_id = self.names.attr_id(name)?;
        self.attrs
            .iter()
            .find(|attr| attr.attr_id == attr_id)
            .map(|attr| attr.value.as_str())
    }

    /// Attributes as resolved `(name, value)` pairs.
    pub fn attr_pairs(&self) -> Result<Vec<(ArcStr, &str)>> {
        self.attrs
            .iter()
            .map(|attr| Ok((self.names.attr(attr.attr_id)?, attr.value.as_str())))
            .collect()
    }

    pub fn id(&self) -> &str { &self.gff_id }

    pub fn gene_name(&self) -> Option<&str> { self.gname.as_deref() }

    pub fn set_gene_name(
        &mut self,
        name: Option<String>,
    ) {
        self.gname = name;
    }

    /// Gene name when known, the feature id otherwise.
    pub fn display_name(&self) -> &str { self.gname.as_deref().unwrap_or(&self.gff_id) }

    pub fn names(&self) -> &NamesRef { &self.names }

    pub fn seq_id(&self) -> usize { self.seq_id }

    pub fn seqname(&self) -> Result<ArcStr> { self.names.seq(self.seq_id) }

    pub fn track(&self) -> Result<ArcStr> { self.names.track(self.track_id) }

    pub fn feature_type(&self) -> Result<ArcStr> { self.names.feature_type(self.ftype_id) }

    pub fn is_transcript(&self) -> bool { self.ftype_id == FID_MRNA }

    fn subfeature_name(&self) -> String {
        self.subftype_id
            .and_then(|id| self.names.feature_type(id).ok())
            .map(|name| name.to_string())
            .unwrap_or_else(|| "exon".to_string())
    }

    pub fn strand(&self) -> Strand { self.strand }

    pub fn score(&self) -> f64 { self.gscore }

    pub fn start(&self) -> u32 { self.gstart }

    pub fn end(&self) -> u32 { self.gend }

    pub fn cds_start(&self) -> u32 { self.cd_start }

    pub fn cds_end(&self) -> u32 { self.cd_end }

    pub fn cds_phase(&self) -> char { self.cd_phase }

    pub fn has_cds(&self) -> bool { self.cd_start > 0 && self.cd_end > 0 }

    /// Whether the exon set was built from CDS segments alone.
    pub fn is_cds_only(&self) -> bool { self.is_cds }

    pub fn exons(&self) -> &[GffExon] { &self.exons }

    pub fn exon_count(&self) -> usize { self.exons.len() }

    pub fn covlen(&self) -> u32 { self.covlen }

    pub fn has_errors(&self) -> bool { self.has_errors }

    pub fn attrs(&self) -> &[GffAttr] { &self.attrs }

    /// Query `(qstart, qend, qlen)` for alignment-derived features.
    pub fn query_extent(&self) -> (u32, u32, u32) { (self.qstart, self.qend, self.qlen) }

    /// `id  strand  start  end  score` summary row.
    pub fn summary(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{:.2}",
            self.gff_id, self.strand, self.gstart, self.gend, self.gscore
        )
    }

    /// Writes the feature as GFF3 (parent line plus `Parent=`-linked
    /// segments) or GTF (segments carrying `gene_id`/`transcript_id`).
    ///
    /// `track_label` replaces the track column when given.
    pub fn write_gxf<W: Write>(
        &self,
        writer: &mut W,
        mode: PrintMode,
        track_label: Option<&str>,
    ) -> Result<()> {
        if self.exons.is_empty() {
            return Ok(());
        }
        let tlabel = match track_label {
            Some(label) => ArcStr::from(label),
            None => self.track()?,
        };
        let seqname = self.seqname()?;
        let show_cds = mode.kinds.shows_cds();
        let show_exon = mode.kinds.shows_exons();

        if mode.format == GxfFormat::Gff3 {
            let (pstart, pend) = if mode.kinds == SegmentKinds::Cds && self.has_cds() {
                (self.cd_start, self.cd_end)
            }
            else {
                (self.gstart, self.gend)
            };
            let ftype = if self.is_transcript() {
                ArcStr::from("mRNA")
            }
            else {
                self.feature_type()?
            };
            let score = if self.gscore > 0.0 {
                format_score(self.gscore)
            }
            else {
                ".".to_string()
            };
            write!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t.\tID={}",
                seqname, tlabel, ftype, pstart, pend, score, self.strand, self.gff_id
            )?;
            if let Some(gname) = &self.gname {
                write!(writer, ";Name={}", gname)?;
            }
            if self.has_cds() && !show_cds && !self.is_cds {
                write!(writer, ";CDS={}:{}", self.cd_start, self.cd_end)?;
            }
            for (key, value) in self.attr_pairs()? {
                write!(writer, ";{}={}", key, value)?;
            }
            writeln!(writer)?;
        }

        // surrogate exons of a CDS-derived model are its CDS segments
        if show_exon || (self.is_cds && show_cds) {
            for exon in &self.exons {
                self.write_segment(
                    writer,
                    mode.format,
                    &tlabel,
                    &seqname,
                    self.is_cds,
                    exon.start,
                    exon.end,
                    Some(exon),
                    exon.phase,
                )?;
            }
        }
        if show_cds && !self.is_cds && self.has_cds() {
            for seg in self.cds_segments() {
                self.write_segment(
                    writer,
                    mode.format,
                    &tlabel,
                    &seqname,
                    true,
                    seg.start,
                    seg.end,
                    None,
                    seg.phase,
                )?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn write_segment<W: Write>(
        &self,
        writer: &mut W,
        format: GxfFormat,
        tlabel: &str,
        seqname: &str,
        is_cds: bool,
        start: u32,
        end: u32,
        exon: Option<&GffExon>,
        phase: char,
    ) -> Result<()> {
        let score = exon
            .map(|e| format_score(e.score))
            .unwrap_or_else(|| ".".to_string());
        let phase = if matches!(phase, '0' | '1' | '2') { phase } else { '.' };
        let ftype = if is_cds {
            "CDS".to_string()
        }
        else {
            self.subfeature_name()
        };
        let attrs = exon.map(|e| e.attrs.as_slice()).unwrap_or_default();

        write!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t",
            seqname, tlabel, ftype, start, end, score, self.strand, phase
        )?;
        match format {
            GxfFormat::Gff3 => {
                write!(writer, "Parent={}", self.gff_id)?;
                for attr in attrs {
                    write!(writer, ";{}={}", self.names.attr(attr.attr_id)?, attr.value)?;
                }
            },
            GxfFormat::Gtf => {
                if self.is_transcript() {
                    write!(
                        writer,
                        "gene_id \"{}\"; transcript_id \"{}\";",
                        self.display_name(),
                        self.gff_id
                    )?;
                }
                for attr in attrs {
                    let key = self.names.attr(attr.attr_id)?;
                    if attr.value.starts_with('"') {
                        write!(writer, " {} {};", key, attr.value)?;
                    }
                    else {
                        write!(writer, " {} \"{}\";", key, attr.value)?;
                    }
                }
            },
        }
        writeln!(writer)?;
        Ok(())
    }
}
