//! Movement service and storage port.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use mazerp_shared::types::{MovementId, ProductId};

use super::error::MovementError;
use super::types::{
    ChildKind, DateRange, ExpenseType, FullMovementRecord, FullMovementView, Movement,
    MovementChild, MovementDraft, MovementFilter, MovementRecord, MovementView,
};
use super::validation::{validate_child, validate_draft};

/// Repository trait for movement persistence.
///
/// This trait is implemented by the db crate. Every composite operation must run as one
/// unit of work: either both the movement and its child are written, or neither is.
pub trait MovementRepository: Send + Sync {
    /// Insert a movement and its child. Fails with `InventoryNotFound` if the
    /// referenced inventory does not exist.
    fn create_with_child(
        &self,
        draft: MovementDraft,
        child: MovementChild,
    ) -> impl std::future::Future<Output = Result<MovementRecord, MovementError>> + Send;

    /// Update a movement and its child of the same kind.
    ///
    /// Returns `None` if the movement or the child no longer exists.
    fn update_with_child(
        &self,
        id: MovementId,
        draft: MovementDraft,
        child: MovementChild,
    ) -> impl std::future::Future<Output = Result<Option<MovementRecord>, MovementError>> + Send;

    /// Delete a child of the given kind, then its movement.
    ///
    /// Returns `false` if no such child exists.
    fn delete_with_child(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> impl std::future::Future<Output = Result<bool, MovementError>> + Send;

    /// Returns true iff a buy, sell or expense references the movement.
    fn has_related_records(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<bool, MovementError>> + Send;

    /// Update a movement that has no child. Fails with `HasRelatedRecords` otherwise.
    fn update_movement(
        &self,
        id: MovementId,
        draft: MovementDraft,
    ) -> impl std::future::Future<Output = Result<Option<Movement>, MovementError>> + Send;

    /// Delete a movement that has no child. Fails with `HasRelatedRecords` otherwise.
    fn delete_movement(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<bool, MovementError>> + Send;

    /// Find a movement with its child, if any.
    fn find_movement(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<Option<MovementView>, MovementError>> + Send;

    /// Find a movement with its child and reference entities.
    fn find_full_movement(
        &self,
        id: MovementId,
    ) -> impl std::future::Future<Output = Result<Option<FullMovementView>, MovementError>> + Send;

    /// List movements matching the filter, most recent first.
    fn list_movements(
        &self,
        filter: MovementFilter,
    ) -> impl std::future::Future<Output = Result<Vec<MovementView>, MovementError>> + Send;

    /// Find a child of the given kind with its movement.
    fn find_record(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> impl std::future::Future<Output = Result<Option<MovementRecord>, MovementError>> + Send;

    /// Find a child of the given kind with its movement and reference entities.
    fn find_full_record(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> impl std::future::Future<Output = Result<Option<FullMovementRecord>, MovementError>> + Send;

    /// List children of the given kind matching the filter, most recent first.
    fn list_records(
        &self,
        kind: ChildKind,
        filter: MovementFilter,
    ) -> impl std::future::Future<Output = Result<Vec<MovementRecord>, MovementError>> + Send;
}

/// Movement service: composite child operations, guarded direct mutation, lookups.
pub struct MovementService<R: MovementRepository> {
    repo: Arc<R>,
}

impl<R: MovementRepository> MovementService<R> {
    /// Create a new movement service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Create a child and its movement as one unit.
    ///
    /// # Errors
    ///
    /// Validation errors, `InventoryNotFound`, or a repository failure.
    pub async fn create(
        &self,
        draft: MovementDraft,
        child: MovementChild,
    ) -> Result<MovementRecord, MovementError> {
        let draft = validate_draft(draft)?;
        validate_child(&child)?;

        self.repo.create_with_child(draft, child).await
    }

    /// Update a child and cascade the movement fields.
    ///
    /// The integrity guard is not consulted: the child is the record that owns the movement.
    ///
    /// # Errors
    ///
    /// `ChildNotFound` if either row is gone, plus validation and repository errors.
    pub async fn update(
        &self,
        id: MovementId,
        draft: MovementDraft,
        child: MovementChild,
    ) -> Result<MovementRecord, MovementError> {
        let draft = validate_draft(draft)?;
        validate_child(&child)?;

        let kind = child.kind();
        self.repo
            .update_with_child(id, draft, child)
            .await?
            .ok_or(MovementError::child_not_found(kind, id))
    }

    /// Delete a child and its movement.
    ///
    /// # Errors
    ///
    /// `ChildNotFound` if there is no child of this kind.
    pub async fn delete(&self, id: MovementId, kind: ChildKind) -> Result<(), MovementError> {
        if self.repo.delete_with_child(id, kind).await? {
            Ok(())
        } else {
            Err(MovementError::child_not_found(kind, id))
        }
    }

    /// Get a child with its movement.
    ///
    /// # Errors
    ///
    /// `ChildNotFound` or a repository failure.
    pub async fn get(&self, id: MovementId, kind: ChildKind) -> Result<MovementRecord, MovementError> {
        self.repo
            .find_record(id, kind)
            .await?
            .ok_or(MovementError::child_not_found(kind, id))
    }

    /// Get a child with its movement and reference entities.
    ///
    /// # Errors
    ///
    /// `ChildNotFound` or a repository failure.
    pub async fn get_full(
        &self,
        id: MovementId,
        kind: ChildKind,
    ) -> Result<FullMovementRecord, MovementError> {
        self.repo
            .find_full_record(id, kind)
            .await?
            .ok_or(MovementError::child_not_found(kind, id))
    }

    /// List children of one kind.
    ///
    /// # Errors
    ///
    /// Repository failure.
    pub async fn list(
        &self,
        kind: ChildKind,
        filter: MovementFilter,
    ) -> Result<Vec<MovementRecord>, MovementError> {
        self.repo.list_records(kind, filter).await
    }

    /// List children of one kind for a product.
    ///
    /// # Errors
    ///
    /// Repository failure.
    pub async fn list_by_product(
        &self,
        kind: ChildKind,
        product_id: ProductId,
    ) -> Result<Vec<MovementRecord>, MovementError> {
        self.list(kind, MovementFilter::by_product(product_id)).await
    }

    /// List children of one kind dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`, before any store access.
    pub async fn list_by_date_range(
        &self,
        kind: ChildKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementRecord>, MovementError> {
        let range = DateRange::new(start, end)?;
        self.list(kind, MovementFilter::by_date_range(range)).await
    }

    /// List expenses of one type.
    ///
    /// # Errors
    ///
    /// Repository failure.
    pub async fn list_expenses_by_type(
        &self,
        expense_type: ExpenseType,
    ) -> Result<Vec<MovementRecord>, MovementError> {
        self.list(ChildKind::Expense, MovementFilter::by_expense_type(expense_type))
            .await
    }

    /// Integrity guard: does any child reference this movement?
    ///
    /// # Errors
    ///
    /// Repository failure.
    pub async fn has_related_records(&self, id: MovementId) -> Result<bool, MovementError> {
        self.repo.has_related_records(id).await
    }

    /// Update a movement outside any child's composite flow.
    ///
    /// # Errors
    ///
    /// `HasRelatedRecords` if a child owns it (nothing is changed), `NotFound` if missing.
    pub async fn update_movement(
        &self,
        id: MovementId,
        draft: MovementDraft,
    ) -> Result<Movement, MovementError> {
        let draft = validate_draft(draft)?;

        if self.repo.has_related_records(id).await? {
            return Err(MovementError::HasRelatedRecords(id));
        }

        self.repo
            .update_movement(id, draft)
            .await?
            .ok_or(MovementError::NotFound(id))
    }

    /// Delete a movement outside any child's composite flow.
    ///
    /// # Errors
    ///
    /// `HasRelatedRecords` if a child owns it (nothing is changed), `NotFound` if missing.
    pub async fn delete_movement(&self, id: MovementId) -> Result<(), MovementError> {
        if self.repo.has_related_records(id).await? {
            return Err(MovementError::HasRelatedRecords(id));
        }

        if self.repo.delete_movement(id).await? {
            Ok(())
        } else {
            Err(MovementError::NotFound(id))
        }
    }

    /// Get a movement with its child.
    ///
    /// # Errors
    ///
    /// `NotFound` or a repository failure.
    pub async fn get_movement(&self, id: MovementId) -> Result<MovementView, MovementError> {
        self.repo
            .find_movement(id)
            .await?
            .ok_or(MovementError::NotFound(id))
    }

    /// Get a movement with its child and reference entities.
    ///
    /// # Errors
    ///
    /// `NotFound` or a repository failure.
    pub async fn get_full_movement(&self, id: MovementId) -> Result<FullMovementView, MovementError> {
        self.repo
            .find_full_movement(id)
            .await?
            .ok_or(MovementError::NotFound(id))
    }

    /// List movements.
    ///
    /// # Errors
    ///
    /// Repository failure.
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
    ) -> Result<Vec<MovementView>, MovementError> {
        self.repo.list_movements(filter).await
    }

    /// List movements dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` when `start > end`, before any store access.
    pub async fn list_movements_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MovementView>, MovementError> {
        let range = DateRange::new(start, end)?;
        self.list_movements(MovementFilter::by_date_range(range)).await
    }
}
