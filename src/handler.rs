use serde::Serialize;

use crate::model::{Admin, Buyer, Influencer, PublicAdmin, PublicBuyer, PublicInfluencer};

/// A record that has a client-safe projection without its `password` field.
pub trait Sanitize {
    type Public: Serialize;

    fn sanitize(&self) -> Self::Public;
}

/// Copy `entity` without its secret, or `None` when there is no entity.
pub fn sanitize<E: Sanitize>(entity: Option<&E>) -> Option<E::Public> {
    entity.map(E::sanitize)
}

pub fn serialize_buyer(buyer: Option<&Buyer>) -> Option<PublicBuyer> {
    sanitize(buyer)
}

pub fn serialize_influencer(influencer: Option<&Influencer>) -> Option<PublicInfluencer> {
    sanitize(influencer)
}

pub fn serialize_admin(admin: Option<&Admin>) -> Option<PublicAdmin> {
    sanitize(admin)
}

impl Sanitize for Buyer {
    type Public = PublicBuyer;

    fn sanitize(&self) -> PublicBuyer {
        PublicBuyer {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Sanitize for Influencer {
    type Public = PublicInfluencer;

    fn sanitize(&self) -> PublicInfluencer {
        PublicInfluencer {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl Sanitize for Admin {
    type Public = PublicAdmin;

    fn sanitize(&self) -> PublicAdmin {
        PublicAdmin {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

// Already sanitized records pass through unchanged.
impl Sanitize for PublicBuyer {
    type Public = PublicBuyer;

    fn sanitize(&self) -> PublicBuyer {
        self.clone()
    }
}

impl Sanitize for PublicInfluencer {
    type Public = PublicInfluencer;

    fn sanitize(&self) -> PublicInfluencer {
        self.clone()
    }
}

impl Sanitize for PublicAdmin {
    type Public = PublicAdmin;

    fn sanitize(&self) -> PublicAdmin {
        self.clone()
    }
}
