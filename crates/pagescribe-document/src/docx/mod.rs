// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module: word-processor output with explicit page breaks.

pub mod writer;

pub use writer::DocxWriter;
