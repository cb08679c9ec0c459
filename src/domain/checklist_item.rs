use super::ChecklistItemId;

pub const DEFAULT_WEIGHT: i32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub category: String,
    pub criterion: String,
    /// Uniform for now. Scoring does not read it.
    pub weight: i32,
    pub is_active: bool,
    pub order_index: i32,
}

impl ChecklistItem {
    pub fn new(category: String, criterion: String, order_index: i32) -> Self {
        Self {
            id: ChecklistItemId::new(),
            category,
            criterion,
            weight: DEFAULT_WEIGHT,
            is_active: true,
            order_index,
        }
    }

    pub fn as_criterion(&self) -> Criterion {
        Criterion {
            id: self.id,
            category: self.category.clone(),
            text: self.criterion.clone(),
        }
    }
}

/// The slice of an active checklist item that analysis works with.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub id: ChecklistItemId,
    pub category: String,
    pub text: String,
}

/// Partial update applied to a checklist item. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ChecklistItemPatch {
    pub category: Option<String>,
    pub criterion: Option<String>,
    pub weight: Option<i32>,
    pub is_active: Option<bool>,
    pub order_index: Option<i32>,
}

impl ChecklistItemPatch {
    pub fn apply(self, item: &mut ChecklistItem) {
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(criterion) = self.criterion {
            item.criterion = criterion;
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
        if let Some(order_index) = self.order_index {
            item.order_index = order_index;
        }
    }
}
