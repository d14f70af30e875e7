//! Positional partitioning of ranked records into disclosure tiers.
//!
//! Tiers are filled strictly by rank position. Confidence never decides membership, so a
//! result set made only of weak matches still fills the visible tiers.

use serde::Serialize;

use crate::rank::RankedRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TierName {
	Primary,
	Other,
	All,
	Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TierSpec {
	pub name: TierName,
	/// `None` means unbounded.
	pub capacity: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierConfig {
	pub primary: usize,
	pub other: usize,
	pub all: usize,
}
impl TierConfig {
	pub fn from_config(cfg: &celeste_config::Tiers) -> Self {
		Self { primary: cfg.primary as usize, other: cfg.other as usize, all: cfg.all as usize }
	}

	pub fn specs(&self) -> [TierSpec; 4] {
		[
			TierSpec { name: TierName::Primary, capacity: Some(self.primary) },
			TierSpec { name: TierName::Other, capacity: Some(self.other) },
			TierSpec { name: TierName::All, capacity: Some(self.all) },
			TierSpec { name: TierName::Hidden, capacity: None },
		]
	}

	pub fn finite_capacity(&self) -> usize {
		self.primary.saturating_add(self.other).saturating_add(self.all)
	}
}
impl Default for TierConfig {
	fn default() -> Self {
		Self::from_config(&celeste_config::Tiers::default())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HiddenTier {
	pub count: usize,
	pub records: Vec<RankedRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tiers {
	pub primary: Vec<RankedRecord>,
	pub other: Vec<RankedRecord>,
	pub all: Vec<RankedRecord>,
	pub hidden: HiddenTier,
}
impl Tiers {
	pub fn showing_count(&self) -> usize {
		self.primary.len() + self.other.len() + self.all.len()
	}

	pub fn hidden_count(&self) -> usize {
		self.hidden.count
	}

	pub fn len(&self) -> usize {
		self.showing_count() + self.hidden_count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Every record in tier order, which is also rank order.
	pub fn iter(&self) -> impl Iterator<Item = &RankedRecord> {
		self.primary
			.iter()
			.chain(self.other.iter())
			.chain(self.all.iter())
			.chain(self.hidden.records.iter())
	}
}

pub fn partition(ranked: &[RankedRecord], cfg: &TierConfig) -> Tiers {
	let mut rest = ranked;
	let primary = take_front(&mut rest, cfg.primary);
	let other = take_front(&mut rest, cfg.other);
	let all = take_front(&mut rest, cfg.all);
	let hidden = rest.to_vec();

	Tiers { primary, other, all, hidden: HiddenTier { count: hidden.len(), records: hidden } }
}

fn take_front(rest: &mut &[RankedRecord], capacity: usize) -> Vec<RankedRecord> {
	let remaining = *rest;
	let (head, tail) = remaining.split_at(capacity.min(remaining.len()));

	*rest = tail;

	head.to_vec()
}
