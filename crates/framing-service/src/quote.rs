//! # Quote Service
//!
//! Resolves catalog materials, snapshots their prices and runs the pricing
//! engine for the order form.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  preview (every keystroke)          save (create / update frame)        │
//! │  ─────────────────────────          ────────────────────────────        │
//! │  unknown material → skipped         unknown material → NOT_FOUND        │
//! │  no manual price → config default   no manual price → no frame cost     │
//! │  quantity clamped                   quantity > 999 rejected             │
//! │  nothing stored                     delivered order → ORDER_LOCKED      │
//! │                                                                         │
//! │            └──────────────┬──────────────────┘                          │
//! │                           ▼                                             │
//! │            framing_core::calculate_frame_order_price                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use framing_core::validation::validate_order_quantity;
use framing_core::{
    calculate_frame_order_price, CustomerOrder, FrameOrder, FrameOrderRequest, FramePricing,
    ItemizedFrameOrder, ItemizedQuote, MaterialSlots, OrderTemplate, PriceCalculationResult,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::MaterialCatalog;
use crate::config::FramingConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::templates::TemplateStore;

/// How unknown material ids are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialLookup {
    /// Skip with a warning.
    Lenient,
    /// Fail with `MaterialNotFound`.
    Strict,
}

/// Pricing entry point for the order form.
#[derive(Clone)]
pub struct QuoteService {
    config: Arc<FramingConfig>,
    catalog: Arc<dyn MaterialCatalog>,
    templates: Arc<dyn TemplateStore>,
}

impl QuoteService {
    pub fn new(
        config: FramingConfig,
        catalog: Arc<dyn MaterialCatalog>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        QuoteService {
            config: Arc::new(config),
            catalog,
            templates,
        }
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Looks up every material id on the request and freezes its price.
    pub async fn resolve_materials(
        &self,
        request: &FrameOrderRequest,
        lookup: MaterialLookup,
    ) -> ServiceResult<MaterialSlots> {
        let mut slots = MaterialSlots::default();

        for (slot, id) in request.material_ids() {
            match self.catalog.material_by_id(id).await? {
                Some(material) => {
                    debug!(%slot, id, price = %material.sales_price, "Material resolved");
                    slots.set(slot, Some(material.snapshot()));
                }
                None if lookup == MaterialLookup::Strict => {
                    return Err(ServiceError::MaterialNotFound {
                        slot,
                        id: id.to_string(),
                    });
                }
                None => warn!(%slot, id, "Unknown material ignored in preview"),
            }
        }

        Ok(slots)
    }

    /// Live preview. Never persists and never fails on unknown materials.
    pub async fn preview(
        &self,
        request: &FrameOrderRequest,
        tenant: Option<&str>,
    ) -> ServiceResult<PriceCalculationResult> {
        let materials = self.resolve_materials(request, MaterialLookup::Lenient).await?;
        let defaults = self.config.request_defaults(tenant, true);
        let params = self.config.pricing_params(tenant);

        let input = request.into_input(materials, &defaults);
        let result = calculate_frame_order_price(&input, &params);

        debug!(
            tenant = tenant.unwrap_or("default"),
            method = ?result.calculation_method,
            total = %result.total_incl_vat,
            "Preview calculated"
        );
        Ok(result)
    }

    async fn price_for_save(
        &self,
        request: &FrameOrderRequest,
        tenant: Option<&str>,
    ) -> ServiceResult<PriceCalculationResult> {
        let quantity = validate_order_quantity(request.requested_quantity())?;
        let materials = self.resolve_materials(request, MaterialLookup::Strict).await?;
        let defaults = self.config.request_defaults(tenant, false);
        let params = self.config.pricing_params(tenant);

        let mut input = request.into_input(materials, &defaults);
        input.quantity = quantity;
        Ok(calculate_frame_order_price(&input, &params))
    }

    /// Prices a new frame order and attaches it to `order`.
    pub async fn create_frame_order(
        &self,
        order: &mut CustomerOrder,
        request: &FrameOrderRequest,
        tenant: Option<&str>,
    ) -> ServiceResult<Uuid> {
        order.ensure_editable()?;
        let result = self.price_for_save(request, tenant).await?;

        let total = result.total_incl_vat;
        let frame = FrameOrder {
            motif: request.motif.clone(),
            notes: request.notes.clone(),
            ..FrameOrder::new(FramePricing::Fixed(result))
        };
        let frame_id = order.add_frame(frame)?;

        info!(
            order_number = %order.order_number,
            %frame_id,
            %total,
            "Frame order created"
        );
        Ok(frame_id)
    }

    /// Re-prices an existing frame order from an edited form.
    ///
    /// Materials are looked up again, so the new snapshot reflects current
    /// catalog prices.
    pub async fn update_frame_order(
        &self,
        order: &mut CustomerOrder,
        frame_id: Uuid,
        request: &FrameOrderRequest,
        tenant: Option<&str>,
    ) -> ServiceResult<()> {
        order.ensure_editable()?;
        let result = self.price_for_save(request, tenant).await?;
        let total = result.total_incl_vat;

        order.replace_pricing(frame_id, FramePricing::Fixed(result))?;
        if let Some(frame) = order.frames.iter_mut().find(|f| f.id == frame_id) {
            frame.motif = request.motif.clone();
            frame.notes = request.notes.clone();
        }

        info!(order_number = %order.order_number, %frame_id, %total, "Frame order updated");
        Ok(())
    }

    /// Prices an itemized order with the tenant's parameters.
    pub fn price_itemized(
        &self,
        order: &ItemizedFrameOrder,
        tenant: Option<&str>,
    ) -> ServiceResult<ItemizedQuote> {
        let params = self.config.pricing_params(tenant);
        let quote = order.price(&params)?;
        debug!(items = quote.items.len(), total = %quote.total_incl_vat, "Itemized order priced");
        Ok(quote)
    }

    pub async fn list_templates(&self) -> ServiceResult<Vec<OrderTemplate>> {
        self.templates.list_templates().await
    }

    /// Pre-populates an itemized order from a saved template.
    pub async fn apply_template(
        &self,
        template_id: Uuid,
        order: &mut ItemizedFrameOrder,
    ) -> ServiceResult<()> {
        let template = self
            .templates
            .get_template(template_id)
            .await?
            .ok_or_else(|| ServiceError::TemplateNotFound(template_id.to_string()))?;

        template.apply(order);
        info!(template = %template.name, items = order.items.len(), "Template applied");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
