// Vulkan Instance - API entry point
//
// Responsibilities:
// - Layer and extension negotiation against what the loader offers
// - Instance creation
// - Debug messenger for validation output (debug builds)

use ash::{vk, Entry};
use std::ffi::{c_char, CStr, CString};
use std::sync::Arc;

use super::error::{BootstrapError, BootstrapResult};

pub const VALIDATION_LAYERS: &[&CStr] = &[c"VK_LAYER_KHRONOS_validation"];

pub const ENGINE_NAME: &CStr = c"Ember";

/// Names from `required` that do not appear in `available`, in order.
pub fn missing_names(required: &[&CStr], available: &[CString]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !available.iter().any(|a| a.as_c_str() == **name))
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

/// Fail unless every validation layer is offered by the loader.
pub fn check_validation_layers(available: &[CString]) -> BootstrapResult<()> {
    let missing = missing_names(VALIDATION_LAYERS, available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BootstrapError::ValidationLayersUnavailable { missing })
    }
}

/// Fail unless every required instance extension is offered by the loader.
pub fn check_extensions(required: &[&CStr], available: &[CString]) -> BootstrapResult<()> {
    let missing = missing_names(required, available);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(BootstrapError::ExtensionsUnavailable { missing })
    }
}

/// Owns the instance and the entry it was loaded from.
pub struct VulkanInstance {
    pub surface_loader: ash::khr::surface::Instance,
    pub instance: ash::Instance,
    pub entry: Entry,
}

impl VulkanInstance {
    pub fn new(
        entry: &Entry,
        app_name: &CStr,
        extensions: &[&CStr],
        layers: &[&CStr],
    ) -> BootstrapResult<Arc<Self>> {
        let app_info = vk::ApplicationInfo::default()
            .application_name(app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(ENGINE_NAME)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_2);

        for ext in extensions {
            log::info!(target: "renderer", "Vulkan - Required extension: {}", ext.to_string_lossy());
        }
        if !layers.is_empty() {
            log::debug!(target: "renderer", "Vulkan - Enabled validation layers (size={})", layers.len());
        }

        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = layers.iter().map(|l| l.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(BootstrapError::InstanceCreation)?;
        let surface_loader = ash::khr::surface::Instance::new(entry, &instance);

        Ok(Arc::new(Self {
            surface_loader,
            instance,
            entry: entry.clone(),
        }))
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        log::debug!(target: "renderer", "Destroying Vulkan instance");
        unsafe { self.instance.destroy_instance(None) };
    }
}

/// Routes validation messages into the log. Lives no longer than the
/// instance it was installed on.
pub struct DebugMessenger {
    debug_utils: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
    _instance: Arc<VulkanInstance>,
}

impl DebugMessenger {
    pub fn new(instance: Arc<VulkanInstance>) -> Result<Self, vk::Result> {
        let debug_utils = ash::ext::debug_utils::Instance::new(&instance.entry, &instance.instance);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }?;

        Ok(Self {
            debug_utils,
            messenger,
            _instance: instance,
        })
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        unsafe {
            self.debug_utils
                .destroy_debug_utils_messenger(self.messenger, None);
        }
    }
}

// Called synchronously by the driver on its own stack.
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _p_user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() || (*p_callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*p_callback_data).p_message);

    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::error!(target: "vulkan", "{:?}: {}", message_type, message.to_string_lossy());
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        log::warn!(target: "vulkan", "{:?}: {}", message_type, message.to_string_lossy());
    }

    vk::FALSE
}
