use std::{
    fmt::Display,
    io::{stdout, Write},
    sync::atomic::{AtomicBool, Ordering},
};

use derive_more::AddAssign;

use crate::alphabet::Seq;

#[derive(Default, Clone, Copy, AddAssign, Debug)]
pub struct Timing {
    /// fill + traceback
    pub total: f64,
    /// filling the cube
    pub fill: f64,
    /// enumerating alignments
    pub traceback: f64,
}

#[derive(Default, Clone, AddAssign, Debug)]
pub struct AlignStats {
    pub len_a: usize,
    pub len_b: usize,
    pub len_c: usize,
    /// The optimal score, summed over samples.
    pub score: i64,
    /// Cells in the cube, the origin included.
    pub cells: usize,
    /// Number of co-optimal alignments reported.
    pub alignments: usize,
    /// Number of triples whose enumeration hit the limit.
    pub truncated: usize,

    pub timing: Timing,
    pub sample_size: usize,
}

impl AlignStats {
    pub fn init([a, b, c]: [Seq; 3]) -> Self {
        Self {
            len_a: a.len(),
            len_b: b.len(),
            len_c: c.len(),
            cells: (a.len() + 1) * (b.len() + 1) * (c.len() + 1),
            sample_size: 1,
            ..Default::default()
        }
    }

    pub fn print(&self) {
        self.print_internal(true);
    }
    pub fn print_no_newline(&self) {
        self.print_internal(false);
    }

    fn format_raw<T: Display>(
        &self,
        align: char,
        width: usize,
        title: &str,
        val: T,
    ) -> (String, String) {
        if align == '<' {
            (format!("{:<width$}", title), format!("{:<width$}", val))
        } else {
            (format!("{:>width$}", title), format!("{:>width$}", val))
        }
    }

    fn format_flt<T: Display>(
        &self,
        align: char,
        mut width: usize,
        title: &str,
        val: T,
    ) -> (String, String) {
        let val = val.to_string();
        // Never cut digits before the decimal point.
        let point = val.find('.').unwrap_or(val.len());
        width = width.max(point);
        let val = &val[..val.len().min(width)];
        self.format_raw(align, width, title, val)
    }

    fn format_avg<T: Display + num_traits::AsPrimitive<f32>>(
        &self,
        align: char,
        width: usize,
        title: &str,
        val: T,
    ) -> (String, String) {
        self.format_flt(align, width, title, val.as_() / self.sample_size as f32)
    }

    pub fn values(&self) -> (Vec<String>, Vec<String>) {
        [
            self.format_raw('>', 7, "nr", self.sample_size),
            self.format_avg('>', 8, "|a|", self.len_a),
            self.format_avg('>', 8, "|b|", self.len_b),
            self.format_avg('>', 8, "|c|", self.len_c),
            self.format_avg('>', 10, "cells", self.cells),
            self.format_avg('>', 8, "score", self.score),
            self.format_avg('>', 8, "alns", self.alignments),
            self.format_raw('>', 5, "trunc", self.truncated),
            self.format_avg('>', 8, "t", 1000. * self.timing.total),
            self.format_avg('>', 8, "fill", 1000. * self.timing.fill),
            self.format_avg('>', 8, "trace", 1000. * self.timing.traceback),
            self.format_flt(
                '>',
                8,
                "ns/cell",
                1e9 * self.timing.fill / self.cells.max(1) as f64,
            ),
        ]
        .into_iter()
        .unzip()
    }

    fn print_internal(&self, newline: bool) {
        let (header, values) = self.values();
        static PRINTED_HEADER: AtomicBool = AtomicBool::new(false);
        if !PRINTED_HEADER.swap(true, Ordering::Relaxed) {
            println!("{}", header.join(" "));
        }
        print!("{}", values.join(" "));
        if newline {
            println!();
        } else {
            stdout().flush().ok();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn averages_over_samples() {
        let a = [crate::alphabet::Symbol::A; 4];
        let mut total = AlignStats::default();
        let mut s = AlignStats::init([&a[..], &a[..2], &[]]);
        s.score = 10;
        s.alignments = 3;
        assert_eq!(s.cells, 5 * 3);
        total += s.clone();
        s.score = 20;
        s.alignments = 1;
        s.truncated = 1;
        total += s.clone();

        assert_eq!(total.sample_size, 2);
        let (header, values) = total.values();
        assert_eq!(header.len(), values.len());
        let get = |name: &str| {
            let idx = header.iter().position(|h| h.trim() == name).unwrap();
            values[idx].trim().to_string()
        };
        assert_eq!(get("nr"), "2");
        assert_eq!(get("|a|"), "4");
        assert_eq!(get("score"), "15");
        assert_eq!(get("alns"), "2");
        assert_eq!(get("trunc"), "1");

        // Totals may exceed a single score.
        s.score = crate::cost_model::Score::MAX.into();
        let mut total = s.clone();
        total += s;
        assert_eq!(total.score, 2 * i64::from(i32::MAX));
    }
}
