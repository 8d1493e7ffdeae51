//! Per-core stats table and top-N worst-offender reporting.

use std::sync::atomic::Ordering;

use crate::registry::InsnHandle;

fn miss_rate(misses: u64, accesses: u64) -> f64 {
    if accesses == 0 {
        0.0
    } else {
        misses as f64 / accesses as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoreRow {
    pub core: usize,
    pub d_accesses: u64,
    pub d_misses: u64,
    pub d_invals: u64,
    pub i_accesses: u64,
    pub i_misses: u64,
    pub i_invals: u64,
    pub l2_accesses: Option<u64>,
    pub l2_misses: Option<u64>,
    pub l2_invals: Option<u64>,
}

impl CoreRow {
    fn header(has_l2: bool) -> String {
        let mut h = "core #, data accesses, data misses, dmiss rate, dcache inval, \
                      insn accesses, insn misses, imiss rate, icache inval"
            .to_string();
        if has_l2 {
            h.push_str(", l2 accesses, l2 misses, l2 miss rate, l2 inval");
        }
        h
    }

    fn render(&self, label: &str, has_l2: bool) -> String {
        let mut row = format!(
            "{label}, {}, {}, {:.2}, {}, {}, {}, {:.2}, {}",
            self.d_accesses,
            self.d_misses,
            miss_rate(self.d_misses, self.d_accesses),
            self.d_invals,
            self.i_accesses,
            self.i_misses,
            miss_rate(self.i_misses, self.i_accesses),
            self.i_invals,
        );
        if has_l2 {
            let acc = self.l2_accesses.unwrap_or(0);
            let miss = self.l2_misses.unwrap_or(0);
            row.push_str(&format!(
                ", {}, {}, {:.2}, {}",
                acc,
                miss,
                miss_rate(miss, acc),
                self.l2_invals.unwrap_or(0)
            ));
        }
        row
    }

    fn add_assign(&mut self, other: &CoreRow) {
        self.d_accesses += other.d_accesses;
        self.d_misses += other.d_misses;
        self.d_invals += other.d_invals;
        self.i_accesses += other.i_accesses;
        self.i_misses += other.i_misses;
        // do NOT reproduce the source's defect of summing
        // `i_misses` into the invalidation total here.
        self.i_invals += other.i_invals;
        if let (Some(a), Some(b)) = (self.l2_accesses, other.l2_accesses) {
            self.l2_accesses = Some(a + b);
        } else {
            self.l2_accesses = other.l2_accesses.or(self.l2_accesses);
        }
        if let (Some(a), Some(b)) = (self.l2_misses, other.l2_misses) {
            self.l2_misses = Some(a + b);
        } else {
            self.l2_misses = other.l2_misses.or(self.l2_misses);
        }
        if let (Some(a), Some(b)) = (self.l2_invals, other.l2_invals) {
            self.l2_invals = Some(a + b);
        } else {
            self.l2_invals = other.l2_invals.or(self.l2_invals);
        }
    }
}

/// Render the full per-core stats table, with a `sum` row when there is
/// more than one core.
pub fn render_core_table(rows: &[CoreRow]) -> String {
    let has_l2 = rows.iter().any(|r| r.l2_accesses.is_some());
    let mut out = CoreRow::header(has_l2);
    out.push('\n');
    for row in rows {
        out.push_str(&row.render(&row.core.to_string(), has_l2));
        out.push('\n');
    }
    if rows.len() > 1 {
        let mut sum = CoreRow {
            l2_accesses: has_l2.then_some(0),
            l2_misses: has_l2.then_some(0),
            l2_invals: has_l2.then_some(0),
            ..CoreRow::default()
        };
        for row in rows {
            sum.add_assign(row);
        }
        out.push_str(&sum.render("sum", has_l2));
        out.push('\n');
    }
    out
}

fn format_entry(rec: &InsnHandle, count: u64) -> String {
    match &rec.symbol {
        Some(sym) => format!("0x{:08x} ({sym}), {count}, {}", rec.vaddr, rec.disas),
        None => format!("0x{:08x}, {count}, {}", rec.vaddr, rec.disas),
    }
}

fn top_n(records: &[InsnHandle], limit: usize, counter: impl Fn(&InsnHandle) -> u64) -> Vec<String> {
    let mut scored: Vec<(u64, &InsnHandle)> = records.iter().map(|r| (counter(r), r)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(count, rec)| format_entry(rec, count))
        .collect()
}

/// Render the three top-N sections. L2 section omitted
/// when L2 is disabled.
pub fn render_top_n(records: &[InsnHandle], limit: usize, has_l2: bool) -> String {
    let mut sections = vec![(
        "data",
        top_n(records, limit, |r| r.l1_dmisses.load(Ordering::Relaxed)),
    )];
    sections.push((
        "fetch",
        top_n(records, limit, |r| r.l1_imisses.load(Ordering::Relaxed)),
    ));
    if has_l2 {
        sections.push((
            "L2",
            top_n(records, limit, |r| r.l2_misses.load(Ordering::Relaxed)),
        ));
    }

    let mut out = String::new();
    for (i, (kind, entries)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("address, {kind} misses, instruction\n"));
        for entry in entries {
            out.push_str(entry);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_rate_is_zero_with_no_accesses() {
        assert_eq!(miss_rate(0, 0), 0.0);
    }

    #[test]
    fn sum_row_only_appears_for_multiple_cores() {
        let one = vec![CoreRow {
            core: 0,
            d_accesses: 1,
            ..Default::default()
        }];
        assert_eq!(render_core_table(&one).lines().count(), 2);

        let two = vec![
            CoreRow { core: 0, d_accesses: 1, ..Default::default() },
            CoreRow { core: 1, d_accesses: 2, ..Default::default() },
        ];
        let rendered = render_core_table(&two);
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.lines().last().unwrap().starts_with("sum"));
    }
}
