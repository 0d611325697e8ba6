//! Victim surcharge table.
//!
//! The offence date selects one of six bands; within a band the offender's
//! age at the offence selects the adult or youth sub-table, and the
//! sentence type (plus fine amount or custodial term) selects the cell.
//! Offences before 1 October 2012 carry no surcharge.

use chrono::NaiveDate;

use shared_types::{round2, SentenceType};

use super::date;

/// Adult cell indices: 0 conditional discharge, 1 fine floor, 2 fine cap,
/// 3 community/YRO, 4 suspended <=6m, 5 suspended >6m, 6 custody <=6m,
/// 7 custody 6-24m, 8 custody >24m.
struct Band {
    adult: [f64; 9],
    /// 0 conditional discharge, 1 fine/community/YRO, 2 custody or suspended.
    youth: [f64; 3],
    fine_pct: f64,
}

fn band_for(offence_date: NaiveDate) -> Option<Band> {
    if offence_date >= date(2022, 6, 16) {
        Some(Band {
            adult: [26.0, 0.0, 2000.0, 114.0, 154.0, 187.0, 154.0, 187.0, 228.0],
            youth: [20.0, 26.0, 41.0],
            fine_pct: 0.40,
        })
    } else if offence_date >= date(2020, 4, 14) {
        Some(Band {
            adult: [22.0, 34.0, 190.0, 95.0, 128.0, 156.0, 128.0, 156.0, 190.0],
            youth: [17.0, 22.0, 34.0],
            fine_pct: 0.10,
        })
    } else if offence_date >= date(2019, 6, 28) {
        Some(Band {
            adult: [21.0, 32.0, 181.0, 90.0, 122.0, 149.0, 122.0, 149.0, 181.0],
            youth: [16.0, 21.0, 32.0],
            fine_pct: 0.10,
        })
    } else if offence_date >= date(2016, 4, 8) {
        Some(Band {
            adult: [20.0, 30.0, 170.0, 85.0, 115.0, 140.0, 115.0, 140.0, 170.0],
            youth: [15.0, 20.0, 30.0],
            fine_pct: 0.10,
        })
    } else if offence_date >= date(2012, 10, 1) {
        Some(Band {
            adult: [15.0, 20.0, 120.0, 60.0, 80.0, 100.0, 80.0, 100.0, 120.0],
            youth: [10.0, 15.0, 20.0],
            fine_pct: 0.10,
        })
    } else {
        None
    }
}

/// Compute the surcharge in GBP. `term_months` is the custodial term the
/// sentence will be served against (post-plea where available).
pub fn amount(
    offence_date: NaiveDate,
    age_at_offence: u32,
    sentence_type: SentenceType,
    fine_amount: Option<f64>,
    term_months: Option<f64>,
) -> f64 {
    let Some(band) = band_for(offence_date) else {
        return 0.0;
    };

    if age_at_offence < 18 {
        return match sentence_type {
            SentenceType::ConditionalDischarge => band.youth[0],
            SentenceType::Fine
            | SentenceType::CommunityOrder
            | SentenceType::YouthRehabilitationOrder => band.youth[1],
            _ => band.youth[2],
        };
    }

    let term = term_months.unwrap_or(0.0);
    match sentence_type {
        SentenceType::ConditionalDischarge => band.adult[0],
        SentenceType::Fine => match fine_amount {
            None => 0.0,
            Some(fine) => {
                if (band.fine_pct - 0.40).abs() < f64::EPSILON {
                    round2((fine * band.fine_pct).round()).min(band.adult[2])
                } else {
                    (fine * band.fine_pct)
                        .round()
                        .clamp(band.adult[1], band.adult[2])
                }
            }
        },
        SentenceType::CommunityOrder | SentenceType::YouthRehabilitationOrder => band.adult[3],
        SentenceType::SuspendedSentenceOrder => {
            if term <= 6.0 {
                band.adult[4]
            } else {
                band.adult[5]
            }
        }
        // All immediate-custody disposals, including life sentences.
        _ => {
            if term <= 6.0 {
                band.adult[6]
            } else if term <= 24.0 {
                band.adult[7]
            } else {
                band.adult[8]
            }
        }
    }
}
