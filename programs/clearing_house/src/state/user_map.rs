use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::panic::Location;

use anchor_lang::prelude::Pubkey;
use solana_program::msg;

use crate::error::{ClearingHouseResult, ErrorCode};
use crate::state::user::User;

/// Users keyed by their authority.
#[derive(Clone, Default, Debug)]
pub struct UserMap(pub BTreeMap<Pubkey, RefCell<User>>);

impl UserMap {
    #[track_caller]
    #[inline(always)]
    pub fn get_ref(&self, user: &Pubkey) -> ClearingHouseResult<Ref<User>> {
        let cell = match self.0.get(user) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find user {} at {}:{}",
                    user,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::UserNotFound);
            }
        };

        match cell.try_borrow() {
            Ok(user) => Ok(user),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load user {} at {}:{}",
                    user,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadUserAccount)
            }
        }
    }

    #[track_caller]
    #[inline(always)]
    pub fn get_ref_mut(&self, user: &Pubkey) -> ClearingHouseResult<RefMut<User>> {
        let cell = match self.0.get(user) {
            Some(cell) => cell,
            None => {
                let caller = Location::caller();
                msg!(
                    "Could not find user {} at {}:{}",
                    user,
                    caller.file(),
                    caller.line()
                );
                return Err(ErrorCode::UserNotFound);
            }
        };

        match cell.try_borrow_mut() {
            Ok(user) => Ok(user),
            Err(e) => {
                let caller = Location::caller();
                msg!("{:?}", e);
                msg!(
                    "Could not load user {} at {}:{}",
                    user,
                    caller.file(),
                    caller.line()
                );
                Err(ErrorCode::UnableToLoadUserAccount)
            }
        }
    }

    pub fn insert(&mut self, user: User) {
        self.0.insert(user.authority, RefCell::new(user));
    }

    pub fn contains(&self, user: &Pubkey) -> bool {
        self.0.contains_key(user)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pubkey, &RefCell<User>)> {
        self.0.iter()
    }
}
