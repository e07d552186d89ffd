use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Locale {
    #[default]
    #[value(name = "en")]
    English,
    #[value(name = "pl")]
    Polish,
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::English => &EN,
            Locale::Polish => &PL,
        }
    }
}

/// Every user-visible text of the client
pub struct Strings {
    pub app_title: &'static str,
    pub url_label: &'static str,
    pub url_placeholder: &'static str,
    pub fetch_button: &'static str,
    pub loading: &'static str,
    pub author_label: &'static str,
    pub format_label: &'static str,
    pub convert_on: &'static str,
    pub convert_off: &'static str,
    pub download_button: &'static str,
    pub backend_unreachable: &'static str,

    pub error_prefix: &'static str,
    pub no_audio_formats: &'static str,
    pub select_format_alert: &'static str,
    pub enter_url_alert: &'static str,
    pub url_too_long_alert: &'static str,

    pub initializing_download: &'static str,
    pub stage_initializing: &'static str,
    pub stage_starting_download: &'static str,
    pub stage_downloading: &'static str,
    pub stage_download_complete: &'static str,
    pub stage_converting: &'static str,
    pub stage_streaming: &'static str,
    pub stage_completed: &'static str,
    pub processing: &'static str,

    pub download_received: &'static str,
    pub file_ready: &'static str,
    pub download_failed: &'static str,
    pub download_failed_generic: &'static str,
    pub unexpected_error: &'static str,
    pub save_cancelled: &'static str,
}

pub static EN: Strings = Strings {
    app_title: "Simple Audio Grabber",
    url_label: "Video URL:",
    url_placeholder: "Paste a video link...",
    fetch_button: "Fetch info",
    loading: "Loading...",
    author_label: "Author:",
    format_label: "Audio format:",
    convert_on: "Convert to MP3: on",
    convert_off: "Convert to MP3: off",
    download_button: "Download",
    backend_unreachable: "Backend is not reachable",

    error_prefix: "Error",
    no_audio_formats: "No audio formats available",
    select_format_alert: "Select an audio format.",
    enter_url_alert: "Enter a video URL.",
    url_too_long_alert: "The URL is too long.",

    initializing_download: "Initializing download...",
    stage_initializing: "Initializing...",
    stage_starting_download: "Starting download...",
    stage_downloading: "Downloading audio stream...",
    stage_download_complete: "Download complete",
    stage_converting: "Converting to MP3...",
    stage_streaming: "Preparing file for download...",
    stage_completed: "Done.",
    processing: "Processing...",

    download_received: "Download complete. Preparing file...",
    file_ready: "File ready!",
    download_failed: "Error while downloading",
    download_failed_generic: "Error while downloading the file.",
    unexpected_error: "An error occurred",
    save_cancelled: "Saving cancelled.",
};

pub static PL: Strings = Strings {
    app_title: "Simple Audio Grabber",
    url_label: "Adres filmu:",
    url_placeholder: "Wklej link do filmu...",
    fetch_button: "Pobierz informacje",
    loading: "Ładowanie...",
    author_label: "Autor:",
    format_label: "Format audio:",
    convert_on: "Konwertuj do MP3: tak",
    convert_off: "Konwertuj do MP3: nie",
    download_button: "Pobierz",
    backend_unreachable: "Serwer jest niedostępny",

    error_prefix: "Błąd",
    no_audio_formats: "Brak dostępnych formatów audio",
    select_format_alert: "Wybierz format audio.",
    enter_url_alert: "Podaj adres filmu.",
    url_too_long_alert: "Adres jest zbyt długi.",

    initializing_download: "Inicjowanie pobierania...",
    stage_initializing: "Inicjowanie...",
    stage_starting_download: "Start pobierania...",
    stage_downloading: "Pobieranie strumienia audio...",
    stage_download_complete: "Pobieranie zakończone",
    stage_converting: "Konwertowanie do MP3...",
    stage_streaming: "Przygotowywanie pliku do pobrania...",
    stage_completed: "Zakończono.",
    processing: "Przetwarzanie...",

    download_received: "Pobieranie zakończone. Przygotowywanie pliku...",
    file_ready: "Plik gotowy!",
    download_failed: "Błąd podczas pobierania",
    download_failed_generic: "Błąd podczas pobierania pliku.",
    unexpected_error: "Wystąpił błąd",
    save_cancelled: "Zapis anulowany.",
};
