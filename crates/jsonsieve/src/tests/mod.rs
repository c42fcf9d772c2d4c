mod arbitrary;
mod property_documents;
mod property_mutation;
