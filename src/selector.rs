//! Deterministic "of the day" selection.
//!
//! Every caller on the same calendar day gets the same record: the ISO date
//! string is hashed with the classic 31-multiplier string hash (32-bit
//! wrapping) and reduced modulo the collection length. The hash must stay
//! bit-for-bit identical, otherwise historical picks change.

use chrono::NaiveDate;

use crate::app::{ChapelError, Result};
use crate::domain::{ContentKind, DailyPick, VerseOfTheDay};
use crate::fetcher::ContentFetcher;

/// `YYYY-MM-DD`, the only date form the selector hashes.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `hash = hash * 31 + unit` over the UTF-16 code units of `s`, wrapping at
/// 32 bits after every step.
pub fn date_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}

/// Index into a collection of `len` records for `date`.
///
/// Depends only on `len` and `date`, never on the records themselves.
pub fn select_index(len: usize, date: &str) -> Result<usize> {
    if len == 0 {
        return Err(ChapelError::InvalidArgument(
            "cannot select from an empty collection".to_string(),
        ));
    }
    // |i32::MIN| is 2^31, which fits in u32
    let magnitude = u64::from(date_hash(date).unsigned_abs());
    Ok((magnitude % len as u64) as usize)
}

pub fn select<'a, T>(records: &'a [T], date: &str) -> Result<&'a T> {
    let index = select_index(records.len(), date)?;
    Ok(&records[index])
}

/// Fetch the `kind` collection and pick the record for `date`.
///
/// An empty collection is reported as [`ChapelError::EmptyCollection`], not
/// as an invalid argument: it is a content gap, not a caller bug.
pub async fn pick_daily<F>(fetcher: &F, kind: ContentKind, date: NaiveDate) -> Result<DailyPick>
where
    F: ContentFetcher + Send + Sync + ?Sized,
{
    let mut records = fetcher.fetch_collection(kind).await?;
    if records.is_empty() {
        return Err(ChapelError::EmptyCollection(kind));
    }

    let index = select_index(records.len(), &iso_date(date))?;
    let record = records.swap_remove(index);
    tracing::debug!("Picked {} {} at index {} for {}", kind, record.id(), index, date);

    Ok(DailyPick {
        record,
        date,
        index,
    })
}

pub async fn verse_of_the_day<F>(fetcher: &F, date: NaiveDate) -> Result<VerseOfTheDay>
where
    F: ContentFetcher + Send + Sync + ?Sized,
{
    let pick = pick_daily(fetcher, ContentKind::Verse, date).await?;
    let verse = pick.record.into_verse().ok_or_else(|| {
        ChapelError::Other("verse collection returned a non-verse record".to_string())
    })?;
    Ok(VerseOfTheDay { verse, date })
}
