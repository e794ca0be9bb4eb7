// SPDX-FileCopyrightText: 2026 Shelter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handlers. Each one opens the workflow, runs one operation as the
//! acting identity and prints the outcome.

use std::path::Path;
use std::sync::Arc;

use shelter_config::ShelterConfig;
use shelter_core::types::{
    AdoptionView, AnimalQuery, AnimalSearch, AnimalSummary, NewAnimal, NewUser,
};
use shelter_core::{AdoptionId, AnimalId, Identity, ShelterError};
use shelter_storage::Database;
use shelter_workflow::{AdoptionWorkflow, FsPhotoStore};

use crate::upload::copy_photos;
use crate::{AdoptCommand, AnimalChanges, AnimalCommand, AnimalFields, Cli, Commands, UserCommand};

pub async fn run(cli: Cli, config: &ShelterConfig) -> Result<(), ShelterError> {
    let db = Database::open_with_config(&config.storage).await?;
    let photos = FsPhotoStore::open(&config.uploads.directory)?;
    let workflow =
        AdoptionWorkflow::new(db.clone(), Arc::new(photos)).with_per_page(config.listing.per_page);

    let actor = match cli.acting_as.as_deref() {
        Some(username) => Some(workflow.identity_for(username).await?),
        None => None,
    };
    let actor = actor.as_ref();

    let result = match cli.command {
        Commands::User(command) => user(&workflow, actor, command).await,
        Commands::Animal(command) => animal(&workflow, actor, command, config).await,
        Commands::Adopt(command) => adopt(&workflow, actor, command).await,
    };

    db.close().await?;
    result
}

async fn user(
    workflow: &AdoptionWorkflow,
    actor: Option<&Identity>,
    command: UserCommand,
) -> Result<(), ShelterError> {
    match command {
        UserCommand::Add {
            username,
            first_name,
            last_name,
            middle_name,
            role,
        } => {
            let identity = workflow
                .register_user(
                    actor,
                    NewUser {
                        username: username.clone(),
                        first_name,
                        last_name,
                        middle_name,
                        role,
                    },
                )
                .await?;
            println!("Registered {username} as {} (id {}).", identity.role, identity.user_id);
        }
    }
    Ok(())
}

async fn animal(
    workflow: &AdoptionWorkflow,
    actor: Option<&Identity>,
    command: AnimalCommand,
    config: &ShelterConfig,
) -> Result<(), ShelterError> {
    match command {
        AnimalCommand::Add { fields, photos } => {
            let uploaded = copy_photos(
                &photos,
                Path::new(&config.uploads.directory),
                config.uploads.max_upload_bytes,
            )?;
            let id = workflow
                .create_animal(actor, new_animal(fields), uploaded.photos.clone())
                .await?;
            uploaded.keep();
            println!("Animal {id} added.");
        }
        AnimalCommand::Edit { id, changes } => {
            let id = AnimalId(id);
            let current = workflow
                .get_animal(id)
                .await?
                .ok_or_else(|| ShelterError::not_found("animal", id))?;
            workflow
                .edit_animal(actor, id, apply_changes(current.animal, changes))
                .await?;
            println!("Animal {id} updated.");
        }
        AnimalCommand::Show { id } => {
            let id = AnimalId(id);
            let details = workflow
                .get_animal(id)
                .await?
                .ok_or_else(|| ShelterError::not_found("animal", id))?;
            let a = &details.animal;
            println!("#{} {} ({}, {}, {} months)", a.id, a.name, a.breed, a.gender, a.age_months);
            println!("status:   {}", a.status);
            println!("requests: {}", details.adoption_count);
            if !a.description.is_empty() {
                println!("{}", a.description);
            }
            for photo in &details.photos {
                println!("photo:    {} ({})", photo.filename, photo.mime_type);
            }
        }
        AnimalCommand::List {
            page,
            sort_by,
            order,
            status,
        } => {
            let page = workflow
                .list_animals(AnimalQuery {
                    page,
                    sort_by,
                    sort_order: order,
                    status,
                })
                .await?;
            for summary in &page.items {
                print_summary(summary);
            }
            println!(
                "page {} of {} ({} animals)",
                page.page,
                page.total_pages().max(1),
                page.total
            );
        }
        AnimalCommand::Search {
            text,
            status,
            gender,
            breed,
        } => {
            let found = workflow
                .search_animals(AnimalSearch {
                    text,
                    status,
                    gender,
                    breed,
                })
                .await?;
            if found.is_empty() {
                println!("No animals found.");
            }
            for summary in &found {
                print_summary(summary);
            }
        }
        AnimalCommand::Delete { id } => {
            let id = AnimalId(id);
            workflow.delete_animal(actor, id).await?;
            println!("Animal {id} deleted.");
        }
    }
    Ok(())
}

async fn adopt(
    workflow: &AdoptionWorkflow,
    actor: Option<&Identity>,
    command: AdoptCommand,
) -> Result<(), ShelterError> {
    match command {
        AdoptCommand::Submit { animal_id, contact } => {
            let id = workflow
                .submit_request(actor, AnimalId(animal_id), &contact)
                .await?;
            println!("Adoption request {id} submitted.");
        }
        AdoptCommand::Approve { request_id } => {
            workflow
                .approve_request(actor, AdoptionId(request_id))
                .await?;
            println!("Adoption request {request_id} approved.");
        }
        AdoptCommand::Reject { request_id } => {
            workflow
                .reject_request(actor, AdoptionId(request_id))
                .await?;
            println!("Adoption request {request_id} rejected.");
        }
        AdoptCommand::Show { request_id } => {
            let view = workflow.get_request(actor, AdoptionId(request_id)).await?;
            print_request(&view);
            println!("contact: {}", view.request.contact_info);
        }
        AdoptCommand::Pending => {
            let pending = workflow.pending_requests(actor).await?;
            if pending.is_empty() {
                println!("No pending requests.");
            }
            for view in &pending {
                print_request(view);
            }
        }
        AdoptCommand::Mine => {
            for view in &workflow.my_requests(actor).await? {
                print_request(view);
            }
        }
    }
    Ok(())
}

fn new_animal(fields: AnimalFields) -> NewAnimal {
    NewAnimal {
        name: fields.name,
        description: fields.description,
        age_months: fields.age_months,
        breed: fields.breed,
        gender: fields.gender,
        status: fields.status,
    }
}

/// Overlay the given changes on the animal's current fields.
fn apply_changes(current: shelter_core::types::Animal, changes: AnimalChanges) -> NewAnimal {
    NewAnimal {
        name: changes.name.unwrap_or(current.name),
        description: changes.description.unwrap_or(current.description),
        age_months: changes.age_months.unwrap_or(current.age_months),
        breed: changes.breed.unwrap_or(current.breed),
        gender: changes.gender.unwrap_or(current.gender),
        status: changes.status.unwrap_or(current.status),
    }
}

fn print_summary(summary: &AnimalSummary) {
    let a = &summary.animal;
    println!(
        "#{:<4} {:<20} {:<12} {:<11} requests: {}",
        a.id.0, a.name, a.breed, a.status, summary.adoption_count
    );
}

fn print_request(view: &AdoptionView) {
    println!(
        "#{:<4} {:<16} -> {:<20} {:<16} (animal {})",
        view.request.id.0, view.username, view.animal_name, view.request.status, view.animal_status
    );
}
