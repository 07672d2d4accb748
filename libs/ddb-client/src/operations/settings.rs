//! Per-user state: service settings, notifications and ingredient preferences.

use crate::client::Client;
use crate::types::{
    ServiceSetting, ServiceSettingConfiguration, ServiceSettingConfigurationCreationRequestInput,
    ServiceSettingConfigurationUpdateRequestInput, ServiceSettingCreationRequestInput,
    UserIngredientPreference,
    UserIngredientPreferenceCreationRequestInput, UserIngredientPreferenceUpdateRequestInput,
    UserNotification, UserNotificationCreationRequestInput, UserNotificationUpdateRequestInput,
};

impl Client {
    bindings! {
        one CreateServiceSetting => create_service_setting(; ServiceSettingCreationRequestInput) -> ServiceSetting
            = POST ["/api/v1/settings"];
        one GetServiceSetting => get_service_setting(service_setting_id) -> ServiceSetting
            = GET ["/api/v1/settings" {service_setting_id: "serviceSetting"}];
        page GetServiceSettings => get_service_settings() -> ServiceSetting
            = GET ["/api/v1/settings"];
        search SearchForServiceSettings => search_for_service_settings() -> ServiceSetting
            = GET ["/api/v1/settings/search"];
        unit ArchiveServiceSetting => archive_service_setting(service_setting_id)
            = DELETE ["/api/v1/settings" {service_setting_id: "serviceSetting"}];

        /// Choose a value for a service setting, for the caller or their household
        one CreateServiceSettingConfiguration => create_service_setting_configuration(; ServiceSettingConfigurationCreationRequestInput) -> ServiceSettingConfiguration
            = POST ["/api/v1/settings/configurations"];
        one UpdateServiceSettingConfiguration => update_service_setting_configuration(service_setting_configuration_id; ServiceSettingConfigurationUpdateRequestInput) -> ServiceSettingConfiguration
            = PUT ["/api/v1/settings/configurations" {service_setting_configuration_id: "serviceSettingConfiguration"}];
        unit ArchiveServiceSettingConfiguration => archive_service_setting_configuration(service_setting_configuration_id)
            = DELETE ["/api/v1/settings/configurations" {service_setting_configuration_id: "serviceSettingConfiguration"}];
        /// The caller's configurations of the setting called `setting_name`
        page GetServiceSettingConfigurationByName => get_service_setting_configuration_by_name(setting_name) -> ServiceSettingConfiguration
            = GET ["/api/v1/settings/configurations/user" {setting_name: "serviceSettingConfigurationName"}];
        page GetServiceSettingConfigurationsForUser => get_service_setting_configurations_for_user() -> ServiceSettingConfiguration
            = GET ["/api/v1/settings/configurations/user"];
        page GetServiceSettingConfigurationsForHousehold => get_service_setting_configurations_for_household() -> ServiceSettingConfiguration
            = GET ["/api/v1/settings/configurations/household"];

        one CreateUserNotification => create_user_notification(; UserNotificationCreationRequestInput) -> UserNotification
            = POST ["/api/v1/user_notifications"];
        one GetUserNotification => get_user_notification(user_notification_id) -> UserNotification
            = GET ["/api/v1/user_notifications" {user_notification_id: "userNotification"}];
        page GetUserNotifications => get_user_notifications() -> UserNotification
            = GET ["/api/v1/user_notifications"];
        /// Partial update, typically `{"status": "dismissed"}`
        one UpdateUserNotification => update_user_notification(user_notification_id; UserNotificationUpdateRequestInput) -> UserNotification
            = PATCH ["/api/v1/user_notifications" {user_notification_id: "userNotification"}];

        /// One input may name several ingredients, so several preferences come back
        one CreateUserIngredientPreference => create_user_ingredient_preference(; UserIngredientPreferenceCreationRequestInput) -> Vec<UserIngredientPreference>
            = POST ["/api/v1/user_ingredient_preferences"];
        page GetUserIngredientPreferences => get_user_ingredient_preferences() -> UserIngredientPreference
            = GET ["/api/v1/user_ingredient_preferences"];
        one UpdateUserIngredientPreference => update_user_ingredient_preference(user_ingredient_preference_id; UserIngredientPreferenceUpdateRequestInput) -> UserIngredientPreference
            = PUT ["/api/v1/user_ingredient_preferences" {user_ingredient_preference_id: "userIngredientPreference"}];
        unit ArchiveUserIngredientPreference => archive_user_ingredient_preference(user_ingredient_preference_id)
            = DELETE ["/api/v1/user_ingredient_preferences" {user_ingredient_preference_id: "userIngredientPreference"}];
    }
}
