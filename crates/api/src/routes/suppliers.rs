//! Supplier creation and read endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Page, PageRequest, types::DEFAULT_PER_PAGE};
use domain::{Address, Category, Contact, ContactKind, Supplier, SupplierFull, TaxDocument};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

/// Body of `POST /suppliers/full`. Every part is optional here so that a
/// missing part is reported by aggregate validation with its field name.
#[derive(Deserialize)]
pub struct SupplierFullRequest {
    pub supplier: Option<SupplierRequest>,
    pub address: Option<AddressRequest>,
    pub contact: Option<ContactRequest>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

#[derive(Deserialize)]
pub struct SupplierRequest {
    pub name: String,
    /// `cpf` or `cnpj`.
    pub document_kind: String,
    pub document_number: String,
}

#[derive(Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cell: Option<String>,
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl SupplierRequest {
    fn into_supplier(self) -> Result<Supplier, ApiError> {
        let document = TaxDocument::from_parts(&self.document_kind, self.document_number)
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "document_kind must be 'cpf' or 'cnpj', got '{}'",
                    self.document_kind
                ))
            })?;
        Ok(Supplier::new(self.name, document))
    }
}

impl From<AddressRequest> for Address {
    fn from(req: AddressRequest) -> Self {
        let mut address = Address::new(
            req.street,
            req.number,
            req.city,
            req.state,
            req.postal_code,
            req.country,
        );
        address.complement = req.complement;
        address
    }
}

impl ContactRequest {
    fn into_contact(self) -> Result<Contact, ApiError> {
        let kind = match self.kind.as_deref() {
            Some(kind) => kind.parse::<ContactKind>()?,
            None => ContactKind::Primary,
        };
        let mut contact = Contact::new(self.name, self.email);
        contact.phone = self.phone;
        contact.cell = self.cell;
        contact.kind = kind;
        Ok(contact)
    }
}

impl SupplierFullRequest {
    fn into_aggregate(self) -> Result<SupplierFull, ApiError> {
        Ok(SupplierFull {
            supplier: self.supplier.map(SupplierRequest::into_supplier).transpose()?,
            address: self.address.map(Address::from),
            contact: self.contact.map(ContactRequest::into_contact).transpose()?,
            categories: self
                .category_ids
                .into_iter()
                .map(Category::reference)
                .collect(),
        })
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct SupplierFullResponse {
    pub supplier: Supplier,
    pub address: Address,
    pub contact: Contact,
    pub category_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct SupplierPageResponse {
    #[serde(flatten)]
    pub page: Page<Supplier>,
    pub total_pages: u64,
}

impl From<Page<Supplier>> for SupplierPageResponse {
    fn from(page: Page<Supplier>) -> Self {
        Self {
            total_pages: page.total_pages(),
            page,
        }
    }
}

#[derive(Serialize)]
pub struct SupplierDetailResponse {
    pub supplier: Supplier,
    pub address: Option<Address>,
    pub category_ids: Vec<i64>,
}

impl TryFrom<SupplierFull> for SupplierFullResponse {
    type Error = ApiError;

    fn try_from(full: SupplierFull) -> Result<Self, ApiError> {
        let category_ids = full.category_ids();
        match (full.supplier, full.address, full.contact) {
            (Some(supplier), Some(address), Some(contact)) => Ok(Self {
                supplier,
                address,
                contact,
                category_ids,
            }),
            _ => Err(ApiError::Internal(
                "created supplier is missing a part".to_string(),
            )),
        }
    }
}

// -- Handlers --

/// POST /suppliers/full: creates a supplier with its address, contact and
/// category links in one transaction.
#[tracing::instrument(skip(state, req))]
pub async fn create_full(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Option<SupplierFullRequest>>,
) -> Result<(StatusCode, Json<SupplierFullResponse>), ApiError> {
    let full = req.map(SupplierFullRequest::into_aggregate).transpose()?;
    let created = state.full_creator.create_full(full).await?;
    let response = SupplierFullResponse::try_from(created)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /suppliers: paginated list ordered by id.
#[tracing::instrument(skip(state, params))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<SupplierPageResponse>, ApiError> {
    let request = PageRequest::new(
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(DEFAULT_PER_PAGE),
    );
    let page = state.suppliers.list_suppliers(request).await?;
    Ok(Json(SupplierPageResponse::from(page)))
}

/// GET /suppliers/{id}: supplier with its address and category ids.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SupplierDetailResponse>, ApiError> {
    let supplier = state
        .suppliers
        .find_supplier(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("supplier {id} not found")))?;
    let address = state.suppliers.find_address_by_supplier(id).await?;
    let category_ids = state.suppliers.list_category_ids(id).await?;

    Ok(Json(SupplierDetailResponse {
        supplier,
        address,
        category_ids,
    }))
}
