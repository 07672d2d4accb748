//! The shared `valid_*` reference catalog.

use crate::client::Client;
use crate::types::{
    ValidIngredient, ValidIngredientCreationRequestInput, ValidIngredientPreparation,
    ValidIngredientPreparationCreationRequestInput, ValidIngredientPreparationUpdateRequestInput,
    ValidIngredientUpdateRequestInput, ValidInstrument, ValidInstrumentCreationRequestInput,
    ValidInstrumentUpdateRequestInput, ValidMeasurementUnit,
    ValidMeasurementUnitCreationRequestInput, ValidMeasurementUnitUpdateRequestInput,
    ValidPreparation, ValidPreparationCreationRequestInput, ValidPreparationInstrument,
    ValidPreparationInstrumentCreationRequestInput, ValidPreparationInstrumentUpdateRequestInput,
    ValidPreparationUpdateRequestInput,
};

impl Client {
    bindings! {
        one CreateValidIngredient => create_valid_ingredient(; ValidIngredientCreationRequestInput) -> ValidIngredient
            = POST ["/api/v1/valid_ingredients"];
        one GetValidIngredient => get_valid_ingredient(valid_ingredient_id) -> ValidIngredient
            = GET ["/api/v1/valid_ingredients" {valid_ingredient_id: "validIngredient"}];
        page GetValidIngredients => get_valid_ingredients() -> ValidIngredient
            = GET ["/api/v1/valid_ingredients"];
        search SearchForValidIngredients => search_for_valid_ingredients() -> ValidIngredient
            = GET ["/api/v1/valid_ingredients/search"];
        one GetRandomValidIngredient => get_random_valid_ingredient() -> ValidIngredient
            = GET ["/api/v1/valid_ingredients/random"];
        one UpdateValidIngredient => update_valid_ingredient(valid_ingredient_id; ValidIngredientUpdateRequestInput) -> ValidIngredient
            = PUT ["/api/v1/valid_ingredients" {valid_ingredient_id: "validIngredient"}];
        unit ArchiveValidIngredient => archive_valid_ingredient(valid_ingredient_id)
            = DELETE ["/api/v1/valid_ingredients" {valid_ingredient_id: "validIngredient"}];

        one CreateValidInstrument => create_valid_instrument(; ValidInstrumentCreationRequestInput) -> ValidInstrument
            = POST ["/api/v1/valid_instruments"];
        one GetValidInstrument => get_valid_instrument(valid_instrument_id) -> ValidInstrument
            = GET ["/api/v1/valid_instruments" {valid_instrument_id: "validInstrument"}];
        page GetValidInstruments => get_valid_instruments() -> ValidInstrument
            = GET ["/api/v1/valid_instruments"];
        search SearchForValidInstruments => search_for_valid_instruments() -> ValidInstrument
            = GET ["/api/v1/valid_instruments/search"];
        one GetRandomValidInstrument => get_random_valid_instrument() -> ValidInstrument
            = GET ["/api/v1/valid_instruments/random"];
        one UpdateValidInstrument => update_valid_instrument(valid_instrument_id; ValidInstrumentUpdateRequestInput) -> ValidInstrument
            = PUT ["/api/v1/valid_instruments" {valid_instrument_id: "validInstrument"}];
        unit ArchiveValidInstrument => archive_valid_instrument(valid_instrument_id)
            = DELETE ["/api/v1/valid_instruments" {valid_instrument_id: "validInstrument"}];

        one CreateValidMeasurementUnit => create_valid_measurement_unit(; ValidMeasurementUnitCreationRequestInput) -> ValidMeasurementUnit
            = POST ["/api/v1/valid_measurement_units"];
        one GetValidMeasurementUnit => get_valid_measurement_unit(valid_measurement_unit_id) -> ValidMeasurementUnit
            = GET ["/api/v1/valid_measurement_units" {valid_measurement_unit_id: "validMeasurementUnit"}];
        page GetValidMeasurementUnits => get_valid_measurement_units() -> ValidMeasurementUnit
            = GET ["/api/v1/valid_measurement_units"];
        search SearchForValidMeasurementUnits => search_for_valid_measurement_units() -> ValidMeasurementUnit
            = GET ["/api/v1/valid_measurement_units/search"];
        /// Units that make sense for measuring the given ingredient
        page GetValidMeasurementUnitsByIngredient => get_valid_measurement_units_by_ingredient(valid_ingredient_id) -> ValidMeasurementUnit
            = GET ["/api/v1/valid_measurement_units/by_ingredient" {valid_ingredient_id: "validIngredient"}];
        one UpdateValidMeasurementUnit => update_valid_measurement_unit(valid_measurement_unit_id; ValidMeasurementUnitUpdateRequestInput) -> ValidMeasurementUnit
            = PUT ["/api/v1/valid_measurement_units" {valid_measurement_unit_id: "validMeasurementUnit"}];
        unit ArchiveValidMeasurementUnit => archive_valid_measurement_unit(valid_measurement_unit_id)
            = DELETE ["/api/v1/valid_measurement_units" {valid_measurement_unit_id: "validMeasurementUnit"}];

        one CreateValidPreparation => create_valid_preparation(; ValidPreparationCreationRequestInput) -> ValidPreparation
            = POST ["/api/v1/valid_preparations"];
        one GetValidPreparation => get_valid_preparation(valid_preparation_id) -> ValidPreparation
            = GET ["/api/v1/valid_preparations" {valid_preparation_id: "validPreparation"}];
        page GetValidPreparations => get_valid_preparations() -> ValidPreparation
            = GET ["/api/v1/valid_preparations"];
        search SearchForValidPreparations => search_for_valid_preparations() -> ValidPreparation
            = GET ["/api/v1/valid_preparations/search"];
        one GetRandomValidPreparation => get_random_valid_preparation() -> ValidPreparation
            = GET ["/api/v1/valid_preparations/random"];
        one UpdateValidPreparation => update_valid_preparation(valid_preparation_id; ValidPreparationUpdateRequestInput) -> ValidPreparation
            = PUT ["/api/v1/valid_preparations" {valid_preparation_id: "validPreparation"}];
        unit ArchiveValidPreparation => archive_valid_preparation(valid_preparation_id)
            = DELETE ["/api/v1/valid_preparations" {valid_preparation_id: "validPreparation"}];

        one CreateValidPreparationInstrument => create_valid_preparation_instrument(; ValidPreparationInstrumentCreationRequestInput) -> ValidPreparationInstrument
            = POST ["/api/v1/valid_preparation_instruments"];
        one GetValidPreparationInstrument => get_valid_preparation_instrument(valid_preparation_instrument_id) -> ValidPreparationInstrument
            = GET ["/api/v1/valid_preparation_instruments" {valid_preparation_instrument_id: "validPreparationInstrument"}];
        page GetValidPreparationInstruments => get_valid_preparation_instruments() -> ValidPreparationInstrument
            = GET ["/api/v1/valid_preparation_instruments"];
        page GetValidPreparationInstrumentsByPreparation => get_valid_preparation_instruments_by_preparation(valid_preparation_id) -> ValidPreparationInstrument
            = GET ["/api/v1/valid_preparation_instruments/by_preparation" {valid_preparation_id: "validPreparation"}];
        page GetValidPreparationInstrumentsByInstrument => get_valid_preparation_instruments_by_instrument(valid_instrument_id) -> ValidPreparationInstrument
            = GET ["/api/v1/valid_preparation_instruments/by_instrument" {valid_instrument_id: "validInstrument"}];
        one UpdateValidPreparationInstrument => update_valid_preparation_instrument(valid_preparation_instrument_id; ValidPreparationInstrumentUpdateRequestInput) -> ValidPreparationInstrument
            = PUT ["/api/v1/valid_preparation_instruments" {valid_preparation_instrument_id: "validPreparationInstrument"}];
        unit ArchiveValidPreparationInstrument => archive_valid_preparation_instrument(valid_preparation_instrument_id)
            = DELETE ["/api/v1/valid_preparation_instruments" {valid_preparation_instrument_id: "validPreparationInstrument"}];

        one CreateValidIngredientPreparation => create_valid_ingredient_preparation(; ValidIngredientPreparationCreationRequestInput) -> ValidIngredientPreparation
            = POST ["/api/v1/valid_ingredient_preparations"];
        one GetValidIngredientPreparation => get_valid_ingredient_preparation(valid_ingredient_preparation_id) -> ValidIngredientPreparation
            = GET ["/api/v1/valid_ingredient_preparations" {valid_ingredient_preparation_id: "validIngredientPreparation"}];
        page GetValidIngredientPreparations => get_valid_ingredient_preparations() -> ValidIngredientPreparation
            = GET ["/api/v1/valid_ingredient_preparations"];
        page GetValidIngredientPreparationsByIngredient => get_valid_ingredient_preparations_by_ingredient(valid_ingredient_id) -> ValidIngredientPreparation
            = GET ["/api/v1/valid_ingredient_preparations/by_ingredient" {valid_ingredient_id: "validIngredient"}];
        page GetValidIngredientPreparationsByPreparation => get_valid_ingredient_preparations_by_preparation(valid_preparation_id) -> ValidIngredientPreparation
            = GET ["/api/v1/valid_ingredient_preparations/by_preparation" {valid_preparation_id: "validPreparation"}];
        one UpdateValidIngredientPreparation => update_valid_ingredient_preparation(valid_ingredient_preparation_id; ValidIngredientPreparationUpdateRequestInput) -> ValidIngredientPreparation
            = PUT ["/api/v1/valid_ingredient_preparations" {valid_ingredient_preparation_id: "validIngredientPreparation"}];
        unit ArchiveValidIngredientPreparation => archive_valid_ingredient_preparation(valid_ingredient_preparation_id)
            = DELETE ["/api/v1/valid_ingredient_preparations" {valid_ingredient_preparation_id: "validIngredientPreparation"}];
    }
}
