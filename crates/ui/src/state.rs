use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use prodstock_api::product::{Product, ProductId, ProductPatch, ProductSpec};

/// A user intent bound for the gateway, handled by the client worker.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Refresh,
    Create(ProductSpec),
    Update(ProductId, ProductPatch),
    Delete(ProductId),
}

/// The worker's answer to a [`Command`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Loaded(Vec<Product>),
    LoadFailed(String),
    Saved(Product),
    SaveFailed(String),
    Deleted(ProductId),
    DeleteFailed(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    // the original client shipped with descending preselected
    #[default]
    Descending,
}

impl SortOrder {
    pub const ALL: [Self; 2] = [Self::Ascending, Self::Descending];

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "Sort by store code (ascending)",
            Self::Descending => "Sort by store code (descending)",
        }
    }
}

/// Pure display transform: a view over the fetched list ordered by store
/// code, recomputed on every render and never touching the list itself.
pub fn sorted(products: &[Product], order: SortOrder) -> Vec<&Product> {
    let mut view: Vec<_> = products.iter().collect();
    view.sort_by(|a, b| {
        let ordering = a.spec.product_store_code.cmp(&b.spec.product_store_code);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    view
}

/// The modal form as the user types it; parsed field-by-field on submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub product_code: String,
    pub product_name: String,
    pub product_date: String,
    pub product_origin_price: String,
    pub quantity: String,
    pub product_store_code: String,
}

impl From<&ProductSpec> for ProductForm {
    fn from(spec: &ProductSpec) -> Self {
        Self {
            product_code: spec.product_code.clone(),
            product_name: spec.product_name.clone(),
            // pre-fill with a plain calendar-date string
            product_date: spec.product_date.format("%Y-%m-%d").to_string(),
            product_origin_price: spec.product_origin_price.to_string(),
            quantity: spec.quantity.to_string(),
            product_store_code: spec.product_store_code.clone(),
        }
    }
}

impl ProductForm {
    pub fn parse(&self) -> Result<ProductSpec> {
        let product_date = NaiveDate::parse_from_str(self.product_date.trim(), "%Y-%m-%d")
            .map_err(|_| anyhow!("Product Date must be a YYYY-MM-DD date"))?;
        let product_origin_price = self
            .product_origin_price
            .trim()
            .parse()
            .map_err(|_| anyhow!("Origin Price must be a number"))?;
        let quantity = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| anyhow!("Quantity must be an integer"))?;

        Ok(ProductSpec {
            product_code: self.product_code.trim().to_string(),
            product_name: self.product_name.trim().to_string(),
            product_date,
            product_origin_price,
            quantity,
            product_store_code: self.product_store_code.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Open {
        /// `None` while creating, the edited record's id otherwise.
        target: Option<ProductId>,
        form: ProductForm,
        submitting: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// The whole client-side model. The view renders it; user intents and
/// worker events mutate it through the methods below, nothing else.
#[derive(Debug, Default)]
pub struct AppState {
    pub products: Vec<Product>,
    pub sort_order: SortOrder,
    pub modal: Modal,
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn open_create(&mut self) {
        self.modal = Modal::Open {
            target: None,
            form: ProductForm::default(),
            submitting: false,
        };
    }

    pub fn open_edit(&mut self, product: &Product) {
        self.modal = Modal::Open {
            target: Some(product.id),
            form: ProductForm::from(&product.spec),
            submitting: false,
        };
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Parse and submit the form. The modal enters its submitting state
    /// only when every field parses; otherwise it stays editable with an
    /// error notice and no request leaves the client.
    pub fn submit(&mut self) -> Option<Command> {
        let Modal::Open {
            target,
            form,
            submitting,
        } = &mut self.modal
        else {
            return None;
        };
        if *submitting {
            return None;
        }

        match form.parse() {
            Ok(spec) => {
                *submitting = true;
                Some(match target {
                    Some(prod_id) => Command::Update(*prod_id, spec.into()),
                    None => Command::Create(spec),
                })
            }
            Err(error) => {
                self.notice = Some(Notice::error(error.to_string()));
                None
            }
        }
    }

    /// Fold a worker event into the model, returning the follow-up
    /// command when one is due (the post-mutation refetch).
    pub fn apply(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Loaded(products) => {
                self.products = products;
                None
            }
            Event::LoadFailed(message) => {
                self.notice = Some(Notice::error(message));
                None
            }
            Event::Saved(_) => {
                let text = match &self.modal {
                    Modal::Open {
                        target: Some(_), ..
                    } => "Product updated successfully",
                    _ => "New product added successfully",
                };
                self.modal = Modal::Closed;
                self.notice = Some(Notice::info(text));
                Some(Command::Refresh)
            }
            Event::SaveFailed(message) => {
                if let Modal::Open { submitting, .. } = &mut self.modal {
                    *submitting = false;
                }
                self.notice = Some(Notice::error(message));
                None
            }
            Event::Deleted(_) => {
                self.notice = Some(Notice::info("Product deleted successfully"));
                Some(Command::Refresh)
            }
            Event::DeleteFailed(message) => {
                self.notice = Some(Notice::error(message));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use prodstock_api::product::ProductId;

    use super::*;

    fn spec(store_code: &str) -> ProductSpec {
        ProductSpec {
            product_code: "P1".into(),
            product_name: "Widget".into(),
            product_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            product_origin_price: 10.0,
            quantity: 5,
            product_store_code: store_code.into(),
        }
    }

    fn product(store_code: &str) -> Product {
        Product::new(ProductId::new_v4(), spec(store_code))
    }

    #[test]
    fn sorting_is_a_total_order_on_store_code() {
        let products = vec![product("S3"), product("S1"), product("S2")];

        let ascending = sorted(&products, SortOrder::Ascending);
        let codes: Vec<_> = ascending
            .iter()
            .map(|p| p.spec.product_store_code.as_str())
            .collect();
        assert_eq!(codes, vec!["S1", "S2", "S3"]);
        for pair in ascending.windows(2) {
            assert!(pair[0].spec.product_store_code <= pair[1].spec.product_store_code);
        }

        let descending = sorted(&products, SortOrder::Descending);
        let reversed: Vec<_> = ascending.iter().rev().map(|p| p.id).collect();
        let actual: Vec<_> = descending.iter().map(|p| p.id).collect();
        assert_eq!(actual, reversed);
    }

    #[test]
    fn sorting_never_mutates_the_fetched_list() {
        let products = vec![product("S3"), product("S1")];
        let before: Vec<_> = products.iter().map(|p| p.id).collect();

        let _ = sorted(&products, SortOrder::Ascending);

        let after: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn open_for_create_resets_the_form() {
        let mut state = AppState::default();
        state.open_edit(&product("S1"));
        state.open_create();

        assert_eq!(
            state.modal,
            Modal::Open {
                target: None,
                form: ProductForm::default(),
                submitting: false,
            }
        );
    }

    #[test]
    fn open_for_edit_prefills_with_a_plain_date_string() {
        let product = product("S1");
        let mut state = AppState::default();
        state.open_edit(&product);

        let Modal::Open { target, form, .. } = &state.modal else {
            panic!("modal should be open");
        };
        assert_eq!(*target, Some(product.id));
        assert_eq!(form.product_date, "2024-01-01");
        assert_eq!(form.quantity, "5");
        assert_eq!(form.product_code, "P1");
    }

    #[test]
    fn submit_refuses_an_unparsable_form() {
        let mut state = AppState::default();
        state.open_create();
        if let Modal::Open { form, .. } = &mut state.modal {
            *form = ProductForm::from(&spec("S1"));
            form.quantity = "five".into();
        }

        assert_eq!(state.submit(), None);
        assert!(matches!(
            state.modal,
            Modal::Open {
                submitting: false,
                ..
            }
        ));
        assert!(state.notice.as_ref().is_some_and(|n| n.is_error));
    }

    #[test]
    fn successful_submit_closes_and_refetches() {
        let mut state = AppState::default();
        state.open_create();
        if let Modal::Open { form, .. } = &mut state.modal {
            *form = ProductForm::from(&spec("S1"));
        }

        let command = state.submit();
        assert!(matches!(command, Some(Command::Create(_))));
        assert!(matches!(state.modal, Modal::Open { submitting: true, .. }));

        // a second click while in flight is a no-op
        assert_eq!(state.submit(), None);

        let follow_up = state.apply(Event::Saved(product("S1")));
        assert_eq!(follow_up, Some(Command::Refresh));
        assert_eq!(state.modal, Modal::Closed);
        assert!(state.notice.as_ref().is_some_and(|n| !n.is_error));
    }

    #[test]
    fn editing_submit_sends_a_full_patch_for_the_target() {
        let product = product("S1");
        let mut state = AppState::default();
        state.open_edit(&product);

        match state.submit() {
            Some(Command::Update(prod_id, patch)) => {
                assert_eq!(prod_id, product.id);
                assert_eq!(patch, ProductPatch::from(product.spec.clone()));
            }
            other => panic!("expected an update command, got {other:?}"),
        }
    }

    #[test]
    fn failed_submit_keeps_the_modal_open() {
        let mut state = AppState::default();
        state.open_edit(&product("S1"));
        let _ = state.submit();

        let follow_up = state.apply(Event::SaveFailed("Failed to save product".into()));
        assert_eq!(follow_up, None);
        assert!(matches!(
            state.modal,
            Modal::Open {
                submitting: false,
                ..
            }
        ));
        assert!(state.notice.as_ref().is_some_and(|n| n.is_error));
    }

    #[test]
    fn delete_refetches_on_success_and_leaves_the_modal_alone() {
        let product = product("S1");
        let mut state = AppState::default();
        state.open_edit(&product);

        let follow_up = state.apply(Event::Deleted(product.id));
        assert_eq!(follow_up, Some(Command::Refresh));
        assert!(matches!(state.modal, Modal::Open { .. }));

        let follow_up = state.apply(Event::DeleteFailed("Failed to delete product".into()));
        assert_eq!(follow_up, None);
        assert!(state.notice.as_ref().is_some_and(|n| n.is_error));
    }

    #[test]
    fn form_parses_field_by_field() {
        let form = ProductForm {
            product_code: " P1 ".into(),
            product_name: "Widget".into(),
            product_date: "2024-01-01".into(),
            product_origin_price: "10".into(),
            quantity: "5".into(),
            product_store_code: "S2".into(),
        };
        assert_eq!(form.parse().unwrap(), spec("S2"));

        let mut bad_date = form.clone();
        bad_date.product_date = "January 1st".into();
        assert!(bad_date.parse().is_err());

        let mut bad_price = form.clone();
        bad_price.product_origin_price = "free".into();
        assert!(bad_price.parse().is_err());

        let mut bad_quantity = form;
        bad_quantity.quantity = "5.5".into();
        assert!(bad_quantity.parse().is_err());
    }
}
