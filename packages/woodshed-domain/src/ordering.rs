use uuid::Uuid;

/// An item that lives in a position-ordered sibling scope. Within one scope
/// the order values are exactly `{0, 1, ..., n-1}`.
pub trait Ordered {
	fn id(&self) -> Uuid;
	fn order(&self) -> i32;
	fn set_order(&mut self, order: i32);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OrderingError {
	ItemNotFound(Uuid),
	TargetNotFound(Uuid),
}

/// Moves `id` into the slot currently held by `over_id`, shifting only the
/// siblings between the two slots. The slice stays sorted by order.
pub fn move_item<T>(siblings: &mut [T], id: Uuid, over_id: Uuid) -> Result<(), OrderingError>
where
	T: Ordered,
{
	let index = position_of(siblings, id).ok_or(OrderingError::ItemNotFound(id))?;
	let over_index = position_of(siblings, over_id).ok_or(OrderingError::TargetNotFound(over_id))?;

	if index == over_index {
		return Ok(());
	}

	if index < over_index {
		siblings[index..=over_index].rotate_left(1);

		for (offset, sibling) in siblings[index..=over_index].iter_mut().enumerate() {
			sibling.set_order((index + offset) as i32);
		}
	} else {
		siblings[over_index..=index].rotate_right(1);

		for (offset, sibling) in siblings[over_index..=index].iter_mut().enumerate() {
			sibling.set_order((over_index + offset) as i32);
		}
	}

	Ok(())
}

/// Removes `id` and closes the gap: every survivor past the removed slot
/// shifts down by one. Returns the removed item.
pub fn remove_one<T>(siblings: &mut Vec<T>, id: Uuid) -> Result<T, OrderingError>
where
	T: Ordered,
{
	let index = position_of(siblings, id).ok_or(OrderingError::ItemNotFound(id))?;
	let removed = siblings.remove(index);

	for sibling in siblings[index..].iter_mut() {
		sibling.set_order(sibling.order() - 1);
	}

	Ok(removed)
}

/// Removes every id in `ids` in a single counting pass: each survivor's new
/// order is its old order minus the number of removed siblings that preceded
/// it. Returns the removed items in their original order.
pub fn remove_many<T>(siblings: &mut Vec<T>, ids: &[Uuid]) -> Result<Vec<T>, OrderingError>
where
	T: Ordered,
{
	for id in ids {
		if position_of(siblings, *id).is_none() {
			return Err(OrderingError::ItemNotFound(*id));
		}
	}

	let mut removed = Vec::with_capacity(ids.len());
	let mut kept = Vec::with_capacity(siblings.len().saturating_sub(ids.len()));

	for mut sibling in siblings.drain(..) {
		if ids.contains(&sibling.id()) {
			removed.push(sibling);
		} else {
			sibling.set_order(sibling.order() - removed.len() as i32);
			kept.push(sibling);
		}
	}

	*siblings = kept;

	Ok(removed)
}

/// Order for a sibling appended to the end of the scope.
pub fn append_order<T>(siblings: &[T]) -> i32
where
	T: Ordered,
{
	siblings.len() as i32
}

/// True when the orders form exactly `{0, ..., n-1}` in slice order.
pub fn is_contiguous<T>(siblings: &[T]) -> bool
where
	T: Ordered,
{
	siblings.iter().enumerate().all(|(index, sibling)| sibling.order() == index as i32)
}

fn position_of<T>(siblings: &[T], id: Uuid) -> Option<usize>
where
	T: Ordered,
{
	siblings.iter().position(|sibling| sibling.id() == id)
}
