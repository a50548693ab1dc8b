#![cfg(feature = "std")]

use std::io::Write;

use crate::input::Input;
use crate::reply::{ParseResult, Reply};

pub struct Depth {
    depth: usize,
    inc: bool,
}

impl Depth {
    pub fn new() -> Self {
        let depth = DEPTH.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let inc = true;
        Self { depth, inc }
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        if self.inc {
            let _ = DEPTH.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}

impl crate::lib::std::ops::Deref for Depth {
    type Target = usize;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.depth
    }
}

static DEPTH: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

pub enum Severity {
    Ok,
    Error,
}

impl Severity {
    pub fn with_result<I, O>(result: &ParseResult<I, O>) -> Self
    where
        I: Input,
    {
        match result.reply() {
            Reply::Ok { .. } => Self::Ok,
            Reply::Error { .. } => Self::Error,
        }
    }
}

pub fn start<I>(depth: usize, name: &dyn crate::lib::std::fmt::Display, count: usize, input: &I)
where
    I: Input,
{
    let gutter_style = anstyle::Style::new().bold();
    let input_style = anstyle::Style::new().underline();

    let call_width = column_width();

    let count = if 0 < count {
        format!(":{count}")
    } else {
        "".to_owned()
    };
    let call_column = format!("{:depth$}> {name}{count}", "");
    let position = format!("@{}", input.position());

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call_column:call_width$} {gutter_style}|{gutter_reset} {input_style}{position}{input_reset}",
        gutter_style = gutter_style.render(),
        gutter_reset = gutter_style.render_reset(),
        input_style = input_style.render(),
        input_reset = input_style.render_reset(),
    );
}

pub fn end<I, O>(depth: usize, name: &dyn crate::lib::std::fmt::Display, count: usize, result: &ParseResult<I, O>)
where
    I: Input,
{
    let gutter_style = anstyle::Style::new().bold();

    let call_width = column_width();

    let count = if 0 < count {
        format!(":{count}")
    } else {
        "".to_owned()
    };
    let call_column = format!("{:depth$}< {name}{count}", "");

    let severity = Severity::with_result(result);
    let consumed = if result.is_consumed() { "consumed" } else { "empty" };
    let (status_style, status) = match severity {
        Severity::Ok => (
            anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Green.into())),
            format!("ok, {consumed}"),
        ),
        Severity::Error => (
            anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Red.into())),
            format!("error, {consumed}"),
        ),
    };

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{status_style}{call_column:call_width$}{status_reset} {gutter_style}|{gutter_reset} {status_style}{status}{status_reset}",
        gutter_style = gutter_style.render(),
        gutter_reset = gutter_style.render_reset(),
        status_style = status_style.render(),
        status_reset = status_style.render_reset(),
    );
}

fn column_width() -> usize {
    let min_call_width = 40;
    let decor_width = 3;
    let term_width = term_width();
    let extra_width = term_width.checked_sub(min_call_width + decor_width).unwrap_or_default();
    min_call_width + extra_width / 2
}

fn term_width() -> usize {
    columns_env().unwrap_or(80)
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS").ok().and_then(|c| c.parse::<usize>().ok())
}
