//! Request intake: new test requests enter the lifecycle in INITIATED.

use super::engine::RequestLifecycleEngine;
use super::error::LifecycleError;
use super::validation::{validate_test_request, CreateTestRequest};
use crate::db::{self, NewTestRequest};
use crate::models::enums::RequestStatus;
use crate::models::*;

impl RequestLifecycleEngine<'_> {
    /// Create a request owned by `creator`.
    ///
    /// A phone number or email can only have one request that is not yet
    /// COMPLETED.
    pub fn create_request(
        &self,
        input: &CreateTestRequest,
        creator: &User,
    ) -> Result<TestRequest, LifecycleError> {
        validate_test_request(input)?;

        let phone_number = input.phone_number.trim();
        let email = input.email.trim();

        let tx = self.conn.unchecked_transaction()?;

        if db::count_open_requests_for_contact(&tx, phone_number, email)? > 0 {
            tracing::warn!(user_id = creator.id, "Duplicate test request rejected");
            return Err(LifecycleError::Duplicate);
        }

        let now = (self.clock)();
        let request_id = db::insert_test_request(
            &tx,
            &NewTestRequest {
                name: input.name.trim().to_string(),
                age: input.age,
                gender: input.gender,
                address: input.address.trim().to_string(),
                phone_number: phone_number.to_string(),
                email: email.to_string(),
                pin_code: input.pin_code,
                created_by: creator.clone(),
                created: now.date(),
            },
        )?;
        db::insert_flow_entry(&tx, request_id, None, RequestStatus::Initiated, creator, now)?;

        let created = db::get_test_request(&tx, request_id)?
            .ok_or(LifecycleError::NotFound { request_id })?;
        tx.commit()?;

        tracing::info!(request_id, user_id = creator.id, "Test request created");
        Ok(created)
    }
}
