// handlers/mod.rs - Handler tiers
//
// public:    no authentication (/health)
// protected: bearer token redeemed through the introspection authority
//            (/, /projects/*)
pub mod protected;
pub mod public;
