pub mod actor;
pub mod address;
pub mod category;
pub mod city;
pub mod customer;
pub mod film;
pub mod film_actor;
pub mod film_category;
pub mod inventory;
pub mod payment;
pub mod rental;
