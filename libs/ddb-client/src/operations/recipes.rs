use crate::client::Client;
use crate::types::{
    Recipe, RecipeCreationRequestInput, RecipePrepTask, RecipePrepTaskCreationRequestInput,
    RecipePrepTaskUpdateRequestInput, RecipeStep, RecipeStepCompletionCondition,
    RecipeStepCompletionConditionCreationRequestInput,
    RecipeStepCompletionConditionUpdateRequestInput, RecipeStepCreationRequestInput,
    RecipeStepIngredient, RecipeStepIngredientCreationRequestInput,
    RecipeStepIngredientUpdateRequestInput, RecipeStepInstrument,
    RecipeStepInstrumentCreationRequestInput, RecipeStepInstrumentUpdateRequestInput,
    RecipeStepProduct, RecipeStepProductCreationRequestInput, RecipeStepProductUpdateRequestInput,
    RecipeStepUpdateRequestInput, RecipeStepVessel, RecipeStepVesselCreationRequestInput,
    RecipeStepVesselUpdateRequestInput, RecipeUpdateRequestInput,
};

impl Client {
    bindings! {
        one CreateRecipe => create_recipe(; RecipeCreationRequestInput) -> Recipe
            = POST ["/api/v1/recipes"];
        one GetRecipe => get_recipe(recipe_id) -> Recipe
            = GET ["/api/v1/recipes" {recipe_id: "recipe"}];
        page GetRecipes => get_recipes() -> Recipe
            = GET ["/api/v1/recipes"];
        search SearchForRecipes => search_for_recipes() -> Recipe
            = GET ["/api/v1/recipes/search"];
        one UpdateRecipe => update_recipe(recipe_id; RecipeUpdateRequestInput) -> Recipe
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"}];
        unit ArchiveRecipe => archive_recipe(recipe_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"}];
        /// Copy a recipe into the caller's household
        one CloneRecipe => clone_recipe(recipe_id) -> Recipe
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "clone"];
        /// Mermaid flowchart source for the recipe's step graph
        one GetMermaidDiagramForRecipe => get_mermaid_diagram_for_recipe(recipe_id) -> String
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "mermaid"];

        one CreateRecipePrepTask => create_recipe_prep_task(recipe_id; RecipePrepTaskCreationRequestInput) -> RecipePrepTask
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "prep_tasks"];
        one GetRecipePrepTask => get_recipe_prep_task(recipe_id, recipe_prep_task_id) -> RecipePrepTask
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "prep_tasks" {recipe_prep_task_id: "recipePrepTask"}];
        page GetRecipePrepTasks => get_recipe_prep_tasks(recipe_id) -> RecipePrepTask
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "prep_tasks"];
        one UpdateRecipePrepTask => update_recipe_prep_task(recipe_id, recipe_prep_task_id; RecipePrepTaskUpdateRequestInput) -> RecipePrepTask
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "prep_tasks" {recipe_prep_task_id: "recipePrepTask"}];
        unit ArchiveRecipePrepTask => archive_recipe_prep_task(recipe_id, recipe_prep_task_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "prep_tasks" {recipe_prep_task_id: "recipePrepTask"}];

        one CreateRecipeStep => create_recipe_step(recipe_id; RecipeStepCreationRequestInput) -> RecipeStep
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps"];
        one GetRecipeStep => get_recipe_step(recipe_id, recipe_step_id) -> RecipeStep
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"}];
        page GetRecipeSteps => get_recipe_steps(recipe_id) -> RecipeStep
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps"];
        one UpdateRecipeStep => update_recipe_step(recipe_id, recipe_step_id; RecipeStepUpdateRequestInput) -> RecipeStep
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"}];
        unit ArchiveRecipeStep => archive_recipe_step(recipe_id, recipe_step_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"}];

        one CreateRecipeStepIngredient => create_recipe_step_ingredient(recipe_id, recipe_step_id; RecipeStepIngredientCreationRequestInput) -> RecipeStepIngredient
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "ingredients"];
        one GetRecipeStepIngredient => get_recipe_step_ingredient(recipe_id, recipe_step_id, recipe_step_ingredient_id) -> RecipeStepIngredient
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "ingredients" {recipe_step_ingredient_id: "recipeStepIngredient"}];
        page GetRecipeStepIngredients => get_recipe_step_ingredients(recipe_id, recipe_step_id) -> RecipeStepIngredient
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "ingredients"];
        one UpdateRecipeStepIngredient => update_recipe_step_ingredient(recipe_id, recipe_step_id, recipe_step_ingredient_id; RecipeStepIngredientUpdateRequestInput) -> RecipeStepIngredient
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "ingredients" {recipe_step_ingredient_id: "recipeStepIngredient"}];
        unit ArchiveRecipeStepIngredient => archive_recipe_step_ingredient(recipe_id, recipe_step_id, recipe_step_ingredient_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "ingredients" {recipe_step_ingredient_id: "recipeStepIngredient"}];

        one CreateRecipeStepInstrument => create_recipe_step_instrument(recipe_id, recipe_step_id; RecipeStepInstrumentCreationRequestInput) -> RecipeStepInstrument
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "instruments"];
        one GetRecipeStepInstrument => get_recipe_step_instrument(recipe_id, recipe_step_id, recipe_step_instrument_id) -> RecipeStepInstrument
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "instruments" {recipe_step_instrument_id: "recipeStepInstrument"}];
        page GetRecipeStepInstruments => get_recipe_step_instruments(recipe_id, recipe_step_id) -> RecipeStepInstrument
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "instruments"];
        one UpdateRecipeStepInstrument => update_recipe_step_instrument(recipe_id, recipe_step_id, recipe_step_instrument_id; RecipeStepInstrumentUpdateRequestInput) -> RecipeStepInstrument
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "instruments" {recipe_step_instrument_id: "recipeStepInstrument"}];
        unit ArchiveRecipeStepInstrument => archive_recipe_step_instrument(recipe_id, recipe_step_id, recipe_step_instrument_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "instruments" {recipe_step_instrument_id: "recipeStepInstrument"}];

        one CreateRecipeStepVessel => create_recipe_step_vessel(recipe_id, recipe_step_id; RecipeStepVesselCreationRequestInput) -> RecipeStepVessel
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "vessels"];
        one GetRecipeStepVessel => get_recipe_step_vessel(recipe_id, recipe_step_id, recipe_step_vessel_id) -> RecipeStepVessel
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "vessels" {recipe_step_vessel_id: "recipeStepVessel"}];
        page GetRecipeStepVessels => get_recipe_step_vessels(recipe_id, recipe_step_id) -> RecipeStepVessel
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "vessels"];
        one UpdateRecipeStepVessel => update_recipe_step_vessel(recipe_id, recipe_step_id, recipe_step_vessel_id; RecipeStepVesselUpdateRequestInput) -> RecipeStepVessel
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "vessels" {recipe_step_vessel_id: "recipeStepVessel"}];
        unit ArchiveRecipeStepVessel => archive_recipe_step_vessel(recipe_id, recipe_step_id, recipe_step_vessel_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "vessels" {recipe_step_vessel_id: "recipeStepVessel"}];

        one CreateRecipeStepProduct => create_recipe_step_product(recipe_id, recipe_step_id; RecipeStepProductCreationRequestInput) -> RecipeStepProduct
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "products"];
        one GetRecipeStepProduct => get_recipe_step_product(recipe_id, recipe_step_id, recipe_step_product_id) -> RecipeStepProduct
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "products" {recipe_step_product_id: "recipeStepProduct"}];
        page GetRecipeStepProducts => get_recipe_step_products(recipe_id, recipe_step_id) -> RecipeStepProduct
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "products"];
        one UpdateRecipeStepProduct => update_recipe_step_product(recipe_id, recipe_step_id, recipe_step_product_id; RecipeStepProductUpdateRequestInput) -> RecipeStepProduct
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "products" {recipe_step_product_id: "recipeStepProduct"}];
        unit ArchiveRecipeStepProduct => archive_recipe_step_product(recipe_id, recipe_step_id, recipe_step_product_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "products" {recipe_step_product_id: "recipeStepProduct"}];

        one CreateRecipeStepCompletionCondition => create_recipe_step_completion_condition(recipe_id, recipe_step_id; RecipeStepCompletionConditionCreationRequestInput) -> RecipeStepCompletionCondition
            = POST ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "completion_conditions"];
        one GetRecipeStepCompletionCondition => get_recipe_step_completion_condition(recipe_id, recipe_step_id, recipe_step_completion_condition_id) -> RecipeStepCompletionCondition
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "completion_conditions" {recipe_step_completion_condition_id: "recipeStepCompletionCondition"}];
        page GetRecipeStepCompletionConditions => get_recipe_step_completion_conditions(recipe_id, recipe_step_id) -> RecipeStepCompletionCondition
            = GET ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "completion_conditions"];
        one UpdateRecipeStepCompletionCondition => update_recipe_step_completion_condition(recipe_id, recipe_step_id, recipe_step_completion_condition_id; RecipeStepCompletionConditionUpdateRequestInput) -> RecipeStepCompletionCondition
            = PUT ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "completion_conditions" {recipe_step_completion_condition_id: "recipeStepCompletionCondition"}];
        unit ArchiveRecipeStepCompletionCondition => archive_recipe_step_completion_condition(recipe_id, recipe_step_id, recipe_step_completion_condition_id)
            = DELETE ["/api/v1/recipes" {recipe_id: "recipe"} "steps" {recipe_step_id: "recipeStep"} "completion_conditions" {recipe_step_completion_condition_id: "recipeStepCompletionCondition"}];
    }
}
