use std::time::{Duration, Instant};

use eframe::{App, CreationContext, Frame};
use egui::{
    Align, Button, CentralPanel, Color32, ComboBox, Context, Grid, Layout, RichText, ScrollArea,
    TopBottomPanel, Ui, Window,
};
use prodstock_api::product::{Product, ProductId};
use prodstock_client::ProductClientArgs;

use crate::{
    state::{sorted, AppState, Command, Modal, SortOrder},
    worker::Worker,
};

const NOTICE_TTL: Duration = Duration::from_secs(4);

pub struct ProductApp {
    state: AppState,
    worker: Worker,
    notice_deadline: Option<Instant>,
}

impl ProductApp {
    pub fn new(args: ProductClientArgs, cc: &CreationContext) -> Self {
        let worker = Worker::spawn(args, cc.egui_ctx.clone());
        worker.send(Command::Refresh);

        Self {
            state: AppState::default(),
            worker,
            notice_deadline: None,
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.worker.poll() {
            if let Some(follow_up) = self.state.apply(event) {
                self.worker.send(follow_up);
            }
            if self.state.notice.is_some() {
                self.notice_deadline = Some(Instant::now() + NOTICE_TTL);
            }
        }

        if let Some(deadline) = self.notice_deadline {
            if Instant::now() >= deadline {
                self.state.notice = None;
                self.notice_deadline = None;
            }
        }
    }

    fn show_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Product Manage");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let mut sort_order = self.state.sort_order;
                ComboBox::from_id_source("sort_order")
                    .selected_text(sort_order.label())
                    .show_ui(ui, |ui| {
                        for order in SortOrder::ALL {
                            ui.selectable_value(&mut sort_order, order, order.label());
                        }
                    });
                self.state.sort_order = sort_order;

                if ui.button("Add Product").clicked() {
                    self.state.open_create();
                }
            });
        });

        if let Some(notice) = &self.state.notice {
            let color = if notice.is_error {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(&notice.text).color(color));
        }
    }

    fn show_table(&mut self, ui: &mut Ui) {
        let mut edit_target: Option<Product> = None;
        let mut delete_target: Option<ProductId> = None;

        ScrollArea::vertical().show(ui, |ui| {
            Grid::new("products")
                .striped(true)
                .num_columns(7)
                .show(ui, |ui| {
                    for title in [
                        "Product Code",
                        "Product Name",
                        "Product Date",
                        "Origin Price",
                        "Quantity",
                        "Store Code",
                        "Action",
                    ] {
                        ui.label(RichText::new(title).strong());
                    }
                    ui.end_row();

                    for product in sorted(&self.state.products, self.state.sort_order) {
                        ui.label(&product.spec.product_code);
                        ui.label(&product.spec.product_name);
                        ui.label(product.spec.product_date.to_string());
                        ui.label(product.spec.product_origin_price.to_string());
                        ui.label(product.spec.quantity.to_string());
                        ui.label(&product.spec.product_store_code);
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                edit_target = Some(product.clone());
                            }
                            if ui.button("Delete").clicked() {
                                delete_target = Some(product.id);
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        if let Some(product) = edit_target {
            self.state.open_edit(&product);
        }
        if let Some(prod_id) = delete_target {
            self.worker.send(Command::Delete(prod_id));
        }
    }

    fn show_modal(&mut self, ctx: &Context) {
        let Modal::Open {
            target,
            form,
            submitting,
        } = &mut self.state.modal
        else {
            return;
        };

        let title = if target.is_some() {
            "Edit Product"
        } else {
            "Add New Product"
        };
        let mut save_clicked = false;
        let mut cancel_clicked = false;

        Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                Grid::new("product_form").num_columns(2).show(ui, |ui| {
                    ui.label("Product Code");
                    ui.text_edit_singleline(&mut form.product_code);
                    ui.end_row();

                    ui.label("Product Name");
                    ui.text_edit_singleline(&mut form.product_name);
                    ui.end_row();

                    ui.label("Product Date");
                    ui.text_edit_singleline(&mut form.product_date)
                        .on_hover_text("YYYY-MM-DD");
                    ui.end_row();

                    ui.label("Origin Price");
                    ui.text_edit_singleline(&mut form.product_origin_price);
                    ui.end_row();

                    ui.label("Quantity");
                    ui.text_edit_singleline(&mut form.quantity);
                    ui.end_row();

                    ui.label("Store Code");
                    ui.text_edit_singleline(&mut form.product_store_code);
                    ui.end_row();
                });

                ui.horizontal(|ui| {
                    if ui.add_enabled(!*submitting, Button::new("Save")).clicked() {
                        save_clicked = true;
                    }
                    if ui
                        .add_enabled(!*submitting, Button::new("Cancel"))
                        .clicked()
                    {
                        cancel_clicked = true;
                    }
                });
            });

        if cancel_clicked {
            self.state.close_modal();
        } else if save_clicked {
            if let Some(command) = self.state.submit() {
                self.worker.send(command);
            }
        }
    }
}

impl App for ProductApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        self.drain_events();

        TopBottomPanel::top("toolbar").show(ctx, |ui| self.show_toolbar(ui));
        CentralPanel::default().show(ctx, |ui| self.show_table(ui));
        self.show_modal(ctx);

        if self.notice_deadline.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
