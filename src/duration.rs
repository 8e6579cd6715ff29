//! Countdown arithmetic and Bosnian phrasing for the prayer schedule.
//!
//! Everything here is a pure function of its arguments so the countdown
//! components can be exercised without a DOM. The UTC offset is computed
//! once per page load (see `util::local_utc_offset_seconds`) and passed in
//! explicitly.

/// Seconds left until `target_secs`, measured against a fresh wall clock.
///
/// Negative means the moment has already passed. `utc_offset_secs` is the
/// viewer's offset *ahead* of UTC; the schedule timestamps are produced
/// against that same convention, so it is subtracted here.
pub fn remaining_seconds(target_secs: i64, now_millis: f64, utc_offset_secs: i32) -> f64 {
    target_secs as f64 - now_millis / 1000.0 - utc_offset_secs as f64
}

/// Zero-padded `HH:MM:SS` clock string.
///
/// Hours are not clamped, so a target days away renders as e.g. `103:12:09`.
/// Callers never feed a negative duration here; a negative remainder is the
/// rollover signal handled by the countdown state machine.
pub fn format_clock(remaining_secs: f64) -> String {
    let hours = (remaining_secs / 3600.0).trunc() as i64;
    let minutes = ((remaining_secs / 60.0) % 60.0).trunc() as i64;
    let seconds = (remaining_secs % 60.0).trunc() as i64;
    format!("{}:{}:{}", fixed_width(hours), fixed_width(minutes), fixed_width(seconds))
}

fn fixed_width(n: i64) -> String {
    if (0..10).contains(&n) {
        format!("0{n}")
    } else {
        n.to_string()
    }
}

/// Relative phrase such as `za 2 minuta` or `pre 1 sat`.
///
/// Picks the largest unit family that fits the magnitude, then inflects the
/// unit word against that family's own count.
pub fn format_relative(remaining_secs: f64) -> String {
    let prefix = if remaining_secs > 0.0 { "za" } else { "pre" };
    let secs = remaining_secs.abs();

    let hours = (secs / 3600.0).trunc() as i64;
    let minutes = ((secs / 60.0) % 60.0).trunc() as i64;
    let seconds = (secs % 60.0).trunc() as i64;

    let (count, family) = if secs >= 3600.0 {
        (hours, UnitFamily::Hours)
    } else if secs >= 60.0 {
        (minutes, UnitFamily::Minutes)
    } else {
        (seconds, UnitFamily::Seconds)
    };

    format!("{prefix} {count} {}", unit_word(family, count))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitFamily {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberClass {
    Singular,
    Paucal,
    Plural,
}

/// Slavic numeral agreement on the last digit, except that the teens
/// (11..=19) are always plural regardless of their last digit.
fn number_class(n: i64) -> NumberClass {
    if n > 10 && n < 20 {
        return NumberClass::Plural;
    }
    match n % 10 {
        1 => NumberClass::Singular,
        2..=4 => NumberClass::Paucal,
        _ => NumberClass::Plural,
    }
}

/// Inflected unit word for a count.
///
/// The minute family only distinguishes the singular; paucal and plural are
/// both "minuta". That asymmetry is correct Bosnian, not a bug.
pub fn unit_word(family: UnitFamily, n: i64) -> &'static str {
    use NumberClass::*;
    use UnitFamily::*;
    match (family, number_class(n)) {
        (Hours, Singular) => "sat",
        (Hours, Paucal) => "sata",
        (Hours, Plural) => "sati",
        (Minutes, Singular) => "minut",
        (Minutes, _) => "minuta",
        (Seconds, Singular) => "sekundu",
        (Seconds, Paucal) => "sekunde",
        (Seconds, Plural) => "sekundi",
    }
}
